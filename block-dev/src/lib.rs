//! # 块设备接口层
//!
//! 块设备以**扇区**为单位存储数据；
//! [`BlockDevice`] 是对读写块设备的抽象，实现了此特质的类型称为**块设备驱动**。
//! 单个扇区的读写是原子的。

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod ram_disk;

use core::any::Any;

pub use ram_disk::RamDisk;

/// 扇区大小（字节）
pub const SECTOR_SIZE: usize = 512;

/// 一个扇区的数据
pub type Sector = [u8; SECTOR_SIZE];

/// 块设备驱动特质
pub trait BlockDevice: Send + Sync + Any {
    fn read_sector(&self, sector: u32, buf: &mut Sector);
    fn write_sector(&self, sector: u32, buf: &Sector);
    /// 设备的扇区总数
    fn sector_count(&self) -> u32;
}
