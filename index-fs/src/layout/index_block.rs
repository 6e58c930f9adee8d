//! 索引块编解码
//!
//! 一个扇区恰好容纳 [`PTRS_PER_SECTOR`] 个小端 `u32` 字。
//! inode 记录与间接索引块都以这种格式落盘。

use alloc::sync::Arc;
use block_dev::BlockDevice;

use crate::{SECTOR_SIZE, Sector};

/// 每个扇区可容纳的扇区编号数量
pub const PTRS_PER_SECTOR: usize = SECTOR_SIZE / 4;

/// 将若干字编码进一个扇区，剩余部分填 0
pub fn encode_words(words: &[u32]) -> Sector {
    assert!(words.len() <= PTRS_PER_SECTOR);
    let mut sector = [0; SECTOR_SIZE];
    for (chunk, word) in sector.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    sector
}

pub fn decode_words(sector: &Sector) -> [u32; PTRS_PER_SECTOR] {
    let mut words = [0; PTRS_PER_SECTOR];
    for (word, chunk) in words.iter_mut().zip(sector.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

/// 间接索引块：整个扇区连续存储扇区编号，0 表示未分配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndirectBlock([u32; PTRS_PER_SECTOR]);

impl Default for IndirectBlock {
    fn default() -> Self {
        Self([0; PTRS_PER_SECTOR])
    }
}

impl IndirectBlock {
    pub fn load(sector: u32, block_device: &Arc<dyn BlockDevice>) -> Self {
        let mut buf = [0; SECTOR_SIZE];
        block_device.read_sector(sector, &mut buf);
        Self(decode_words(&buf))
    }

    pub fn store(&self, sector: u32, block_device: &Arc<dyn BlockDevice>) {
        block_device.write_sector(sector, &encode_words(&self.0));
    }

    #[inline]
    pub fn get(&self, index: usize) -> u32 {
        self.0[index]
    }

    #[inline]
    pub fn set(&mut self, index: usize, sector: u32) {
        self.0[index] = sector;
    }

    /// 已分配的扇区编号
    pub fn assigned(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied().filter(|&sector| sector != 0)
    }
}
