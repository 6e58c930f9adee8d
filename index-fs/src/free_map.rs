//! # 空闲扇区管理
//!
//! [`SectorAllocator`] 是 inode 层分配扇区的唯一入口；
//! [`FreeMap`] 用位图记录整个设备的扇区占用，改动立即写回磁盘。

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use block_dev::BlockDevice;

use crate::layout::{decode_words, encode_words};
use crate::{SECTOR_BITS, SECTOR_SIZE};

/// 扇区分配器
pub trait SectorAllocator: Send {
    /// 分配 `count` 个连续扇区，返回首个扇区编号；空间不足时返回空
    fn allocate(&mut self, count: usize) -> Option<u32>;
    fn release(&mut self, sector: u32, count: usize);
    fn free_count(&self) -> usize;
}

/// 位图中每组的位数
const GROUP_BITS: usize = 64;
/// 位图区域内每个扇区的组数
const GROUPS_PER_SECTOR: usize = SECTOR_BITS / GROUP_BITS;

/// 扇区占用位图，置位表示已占用
pub struct FreeMap {
    block_device: Arc<dyn BlockDevice>,
    /// 位图的起始扇区
    start_sector: u32,
    /// 位图所指示的扇区总数
    total: u32,
    groups: Vec<u64>,
    free: usize,
}

impl FreeMap {
    /// 指示 `total` 个扇区需要多少个位图扇区
    #[inline]
    pub fn sectors_needed(total: u32) -> u32 {
        total.div_ceil(SECTOR_BITS as u32)
    }

    /// 新建全部空闲的位图并写入磁盘
    pub fn format(block_device: Arc<dyn BlockDevice>, start_sector: u32, total: u32) -> Self {
        let sectors = Self::sectors_needed(total) as usize;
        let free_map = Self {
            block_device,
            start_sector,
            total,
            groups: vec![0; sectors * GROUPS_PER_SECTOR],
            free: total as usize,
        };
        for index in 0..sectors {
            free_map.flush(index);
        }
        free_map
    }

    /// 从磁盘读回位图
    pub fn load(block_device: Arc<dyn BlockDevice>, start_sector: u32, total: u32) -> Self {
        let sectors = Self::sectors_needed(total) as usize;
        let mut groups = Vec::with_capacity(sectors * GROUPS_PER_SECTOR);
        let mut buf = [0; SECTOR_SIZE];
        for index in 0..sectors {
            block_device.read_sector(start_sector + index as u32, &mut buf);
            let words = decode_words(&buf);
            groups.extend(
                words
                    .chunks_exact(2)
                    .map(|pair| pair[0] as u64 | (pair[1] as u64) << 32),
            );
        }

        let mut free_map = Self {
            block_device,
            start_sector,
            total,
            groups,
            free: 0,
        };
        free_map.free = (0..total).filter(|&sector| !free_map.test(sector)).count();
        free_map
    }

    /// 把指定扇区标记为已占用，用于超级块、位图自身等元数据
    pub fn reserve(&mut self, sector: u32) {
        assert!(!self.test(sector), "sector {sector} is already in use");
        self.set(sector, true);
    }

    #[inline]
    fn test(&self, sector: u32) -> bool {
        let (group, bit) = Self::decode(sector);
        self.groups[group] & (1 << bit) != 0
    }

    fn set(&mut self, sector: u32, used: bool) {
        let (group, bit) = Self::decode(sector);
        if used {
            self.groups[group] |= 1 << bit;
            self.free -= 1;
        } else {
            self.groups[group] &= !(1 << bit);
            self.free += 1;
        }
        self.flush(group / GROUPS_PER_SECTOR);
    }

    /// 写回第 `index` 个位图扇区
    fn flush(&self, index: usize) {
        let groups = &self.groups[index * GROUPS_PER_SECTOR..(index + 1) * GROUPS_PER_SECTOR];
        let words: Vec<u32> = groups
            .iter()
            .flat_map(|&bits| [bits as u32, (bits >> 32) as u32])
            .collect();
        self.block_device
            .write_sector(self.start_sector + index as u32, &encode_words(&words));
    }

    /// 扇区编号 -> (组索引, 组内位)
    #[inline]
    fn decode(sector: u32) -> (usize, usize) {
        let sector = sector as usize;
        (sector / GROUP_BITS, sector % GROUP_BITS)
    }
}

impl SectorAllocator for FreeMap {
    fn allocate(&mut self, count: usize) -> Option<u32> {
        if count == 0 || count > self.free {
            return None;
        }

        // 首次适配：寻找第一段足够长的连续空闲扇区
        let mut run_start = 0;
        let mut run_len = 0;
        for sector in 0..self.total {
            if self.test(sector) {
                run_len = 0;
                continue;
            }
            if run_len == 0 {
                run_start = sector;
            }
            run_len += 1;
            if run_len == count {
                for sector in run_start..run_start + count as u32 {
                    self.set(sector, true);
                }
                return Some(run_start);
            }
        }

        None
    }

    fn release(&mut self, sector: u32, count: usize) {
        for sector in sector..sector + count as u32 {
            // 编号一定得有对应的位
            assert!(self.test(sector), "releasing free sector {sector}");
            self.set(sector, false);
        }
    }

    #[inline]
    fn free_count(&self) -> usize {
        self.free
    }
}
