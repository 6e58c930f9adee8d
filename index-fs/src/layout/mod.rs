//! # 磁盘数据结构层
//!
//! index-fs 的磁盘布局：
//! 超级块 | 空闲位图 | 根目录 inode | 数据区（inode 记录、索引块、数据块混排）
//!
//! 所有结构都按小端 `u32` 字编码进整个扇区，不依赖内存布局。

mod index_block;
pub use index_block::{IndirectBlock, PTRS_PER_SECTOR, decode_words, encode_words};

mod super_block;
pub use super_block::SuperBlock;

mod inode;
pub use inode::{DiskInode, MAX_FILE_SIZE};

/// 目录项，也属于磁盘文件系统数据结构
mod dir_entry;
pub use dir_entry::{DirEntry, NAME_MAX_LEN};
