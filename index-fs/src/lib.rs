#![cfg_attr(not(test), no_std)]

extern crate alloc;

/* index-fs 的整体架构，自上而下 */

// 文件系统：格式化、挂载与按名字的操作
mod ifs;

// 平坦的根目录
mod dir;

// 索引节点层：打开的 inode 注册表与文件读写
mod inode;

// 空闲扇区管理
mod free_map;

// 磁盘数据结构层
mod layout;

mod error;

pub use block_dev::{BlockDevice, SECTOR_SIZE, Sector};

pub use self::{
    error::Error,
    free_map::{FreeMap, SectorAllocator},
    ifs::IndexFileSystem,
    inode::Inode,
    layout::{DirEntry, DiskInode, MAX_FILE_SIZE, NAME_MAX_LEN},
};

/// 文件系统魔数
pub const MAGIC: u32 = 0x3b800002;
/// inode 记录的魔数，即 "INOD"
pub const INODE_MAGIC: u32 = 0x494e4f44;
/// 每个扇区的位数
pub const SECTOR_BITS: usize = SECTOR_SIZE * 8;
