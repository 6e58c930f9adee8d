use alloc::sync::Arc;
use block_dev::BlockDevice;

use super::{decode_words, encode_words};
use crate::{MAGIC, SECTOR_SIZE};

/// 超级块：
/// - 提供文件系统合法性校验；
/// - 定位空闲位图与根目录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperBlock {
    /// 魔数：用于校验文件系统合法性
    magic: u32,
    /// 文件系统占据扇区数
    pub total_sectors: u32,
    pub free_map_start: u32,
    pub free_map_sectors: u32,
    /// 根目录 inode 所在扇区
    pub root_dir_sector: u32,
}

impl SuperBlock {
    /// 超级块永远位于 0 号扇区
    pub const SECTOR: u32 = 0;

    #[inline]
    pub fn new(total_sectors: u32, free_map_sectors: u32) -> Self {
        let free_map_start = Self::SECTOR + 1;
        Self {
            magic: MAGIC,
            total_sectors,
            free_map_start,
            free_map_sectors,
            root_dir_sector: free_map_start + free_map_sectors,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn load(block_device: &Arc<dyn BlockDevice>) -> Self {
        let mut buf = [0; SECTOR_SIZE];
        block_device.read_sector(Self::SECTOR, &mut buf);
        let words = decode_words(&buf);
        Self {
            magic: words[0],
            total_sectors: words[1],
            free_map_start: words[2],
            free_map_sectors: words[3],
            root_dir_sector: words[4],
        }
    }

    pub fn store(&self, block_device: &Arc<dyn BlockDevice>) {
        let words = [
            self.magic,
            self.total_sectors,
            self.free_map_start,
            self.free_map_sectors,
            self.root_dir_sector,
        ];
        block_device.write_sector(Self::SECTOR, &encode_words(&words));
    }
}
