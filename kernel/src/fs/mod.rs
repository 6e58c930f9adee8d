//! # 内核文件系统
//!
//! ## 分层（自上而下）
//!
//! 1. 系统调用层
//! 2. 文件描述符层
//! 3. index-fs 索引节点层
//! 4. 块设备驱动层
//!
//! ## 文件描述符层
//!
//! 每个进程通过自己的**文件描述符表**访问打开的文件。
//! 0 与 1 固定指向键盘与控制台，不占用表项；
//! 其余描述符从 2 开始递增分配，关闭后也不复用。

mod fd_table;
mod file;
pub mod stdio;

pub use self::{fd_table::FileTable, file::FileHandle};

/// 内存与存储设备之间的数据交换通道
pub trait File: Send + Sync {
    fn readable(&self) -> bool {
        true
    }

    fn writable(&self) -> bool {
        true
    }

    fn read(&self, buf: &mut [u8]) -> usize;
    fn write(&self, buf: &[u8]) -> usize;
}
