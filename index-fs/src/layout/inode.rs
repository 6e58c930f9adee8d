//! inode 索引记录
//!
//! 每个 inode 恰好占一个扇区，`block_ptr` 分三段：
//! - 直接：[`DIRECT_COUNT`] 个编号，每个都指向一个**数据块**
//! - 一级：[`INDIRECT_COUNT`] 个编号，每个都指向一个一级索引块
//! - 二级：1 个编号，指向一个二级索引块，其中每项再指向一个一级索引块
//!
//! 查找只依据字节偏移计算位置；三个游标只在增长时使用。
//!
//! ## 增长游标
//!
//! - `direct_index`：正在接收增长的 `block_ptr` 槽位，等于 `BLOCK_PTRS` 时已满
//! - `indirect_index`：当前一级索引块（或二级索引块当前子块）内的下一项
//! - `doubly_indirect_index`：二级索引块内当前子块的位置

use alloc::sync::Arc;
use alloc::vec::Vec;
use block_dev::BlockDevice;

use super::{IndirectBlock, PTRS_PER_SECTOR, decode_words, encode_words};
use crate::{INODE_MAGIC, SECTOR_SIZE, Sector, SectorAllocator};

/// 直接索引的槽位数
pub const DIRECT_COUNT: usize = 4;
/// 一级索引的槽位数
pub const INDIRECT_COUNT: usize = 9;
/// 二级索引的槽位数
pub const DOUBLY_COUNT: usize = 1;

const BLOCK_PTRS: usize = DIRECT_COUNT + INDIRECT_COUNT + DOUBLY_COUNT;
/// 第一个一级索引槽位
const INDIRECT_SLOT: usize = DIRECT_COUNT;
/// 二级索引槽位
const DOUBLY_SLOT: usize = DIRECT_COUNT + INDIRECT_COUNT;

/// 直接索引能覆盖的扇区数
const DIRECT_END: usize = DIRECT_COUNT;
/// 用上一级索引后能覆盖的扇区数
const INDIRECT_END: usize = DIRECT_END + INDIRECT_COUNT * PTRS_PER_SECTOR;
/// 用上二级索引后能覆盖的扇区数
const DOUBLY_END: usize = INDIRECT_END + DOUBLY_COUNT * PTRS_PER_SECTOR * PTRS_PER_SECTOR;

/// 单个文件的最大字节数
pub const MAX_FILE_SIZE: u32 = (DOUBLY_END * SECTOR_SIZE) as u32;

/// 魔数、长度、三个游标
const HEADER_WORDS: usize = 5;

/// 文件内第几个扇区落在索引的哪个位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockPos {
    Direct { slot: usize },
    Indirect { slot: usize, entry: usize },
    Doubly { outer: usize, inner: usize },
}

impl BlockPos {
    fn locate(index: usize) -> Option<Self> {
        if index < DIRECT_END {
            Some(Self::Direct { slot: index })
        } else if index < INDIRECT_END {
            // 剔去直接索引的部分
            let index = index - DIRECT_END;
            Some(Self::Indirect {
                slot: INDIRECT_SLOT + index / PTRS_PER_SECTOR,
                entry: index % PTRS_PER_SECTOR,
            })
        } else if index < DOUBLY_END {
            let index = index - INDIRECT_END;
            Some(Self::Doubly {
                outer: index / PTRS_PER_SECTOR,
                inner: index % PTRS_PER_SECTOR,
            })
        } else {
            None
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiskInode {
    /// 文件的字节数
    pub length: u32,
    direct_index: u32,
    indirect_index: u32,
    doubly_indirect_index: u32,
    block_ptr: [u32; BLOCK_PTRS],
}

impl DiskInode {
    /// 读出 `sector` 上的 inode 记录，魔数不符说明磁盘已损坏
    pub fn load(sector: u32, block_device: &Arc<dyn BlockDevice>) -> Self {
        let mut buf = [0; SECTOR_SIZE];
        block_device.read_sector(sector, &mut buf);
        let words = decode_words(&buf);
        assert_eq!(
            words[0], INODE_MAGIC,
            "sector {sector} does not hold an inode"
        );

        let mut block_ptr = [0; BLOCK_PTRS];
        block_ptr.copy_from_slice(&words[HEADER_WORDS..HEADER_WORDS + BLOCK_PTRS]);
        Self {
            length: words[1],
            direct_index: words[2],
            indirect_index: words[3],
            doubly_indirect_index: words[4],
            block_ptr,
        }
    }

    /// 整扇区写回，保留区写 0
    pub fn store(&self, sector: u32, block_device: &Arc<dyn BlockDevice>) {
        let mut words = [0; HEADER_WORDS + BLOCK_PTRS];
        words[..HEADER_WORDS].copy_from_slice(&[
            INODE_MAGIC,
            self.length,
            self.direct_index,
            self.indirect_index,
            self.doubly_indirect_index,
        ]);
        words[HEADER_WORDS..].copy_from_slice(&self.block_ptr);
        block_device.write_sector(sector, &encode_words(&words));
    }

    /// 建立一个容量恰好覆盖 `length` 字节的索引。
    /// 空间不足时退还已分配的扇区并返回空。
    pub fn create(
        length: u32,
        block_device: &Arc<dyn BlockDevice>,
        allocator: &mut dyn SectorAllocator,
    ) -> Option<Self> {
        let mut disk_inode = Self::default();
        if disk_inode.grow(length, block_device, allocator) < length {
            disk_inode.release(block_device, allocator);
            return None;
        }
        Some(disk_inode)
    }

    /// 字节偏移所在的扇区；越过文件末尾时返回空
    pub fn lookup(&self, offset: u32, block_device: &Arc<dyn BlockDevice>) -> Option<u32> {
        if offset >= self.length {
            return None;
        }

        let sector = match BlockPos::locate(offset as usize / SECTOR_SIZE)? {
            BlockPos::Direct { slot } => self.block_ptr[slot],
            BlockPos::Indirect { slot, entry } => {
                IndirectBlock::load(self.block_ptr[slot], block_device).get(entry)
            }
            BlockPos::Doubly { outer, inner } => {
                let child = IndirectBlock::load(self.block_ptr[DOUBLY_SLOT], block_device)
                    .get(outer);
                IndirectBlock::load(child, block_device).get(inner)
            }
        };

        (sector != 0).then_some(sector)
    }

    /// 逐扇区扩展到能容纳 `new_length` 字节，返回扩展后的长度。
    ///
    /// 扇区耗尽时停在最后一个完整分配的扇区，此时长度为已分配扇区数乘以扇区大小，
    /// 但不会小于原长度。超出 [`MAX_FILE_SIZE`] 的请求会被截断。
    pub fn grow(
        &mut self,
        new_length: u32,
        block_device: &Arc<dyn BlockDevice>,
        allocator: &mut dyn SectorAllocator,
    ) -> u32 {
        if new_length <= self.length {
            return self.length;
        }

        let wanted = Self::count_data_sectors(new_length);
        let target = wanted.min(DOUBLY_END);
        let mut allocated = Self::count_data_sectors(self.length);
        while allocated < target {
            if self.extend_one(block_device, allocator).is_none() {
                log::warn!(
                    "inode growth stopped at {allocated} of {target} sectors: out of space"
                );
                break;
            }
            allocated += 1;
        }

        self.length = if allocated == wanted {
            new_length
        } else {
            ((allocated * SECTOR_SIZE) as u32).max(self.length)
        };
        log::trace!("inode grown to {} bytes", self.length);
        self.length
    }

    /// 在游标处追加一个清零的数据扇区
    fn extend_one(
        &mut self,
        block_device: &Arc<dyn BlockDevice>,
        allocator: &mut dyn SectorAllocator,
    ) -> Option<()> {
        let slot = self.direct_index as usize;

        if slot < INDIRECT_SLOT {
            self.block_ptr[slot] = zeroed_sector(block_device, allocator)?;
            self.direct_index += 1;
        } else if slot < DOUBLY_SLOT {
            let (table, fresh) = self.index_block(slot, block_device, allocator)?;
            let Some(data) = zeroed_sector(block_device, allocator) else {
                if fresh {
                    allocator.release(table, 1);
                    self.block_ptr[slot] = 0;
                }
                return None;
            };

            let mut indirect = IndirectBlock::load(table, block_device);
            indirect.set(self.indirect_index as usize, data);
            indirect.store(table, block_device);

            self.indirect_index += 1;
            if self.indirect_index as usize == PTRS_PER_SECTOR {
                self.indirect_index = 0;
                self.direct_index += 1;
            }
        } else if slot == DOUBLY_SLOT {
            let (outer_sector, outer_fresh) = self.index_block(slot, block_device, allocator)?;
            let mut outer = IndirectBlock::load(outer_sector, block_device);
            let child_index = self.doubly_indirect_index as usize;

            // 子块编号为0表示进入新块
            let child_fresh = outer.get(child_index) == 0;
            let child = if child_fresh {
                match zeroed_sector(block_device, allocator) {
                    Some(child) => child,
                    None => {
                        if outer_fresh {
                            allocator.release(outer_sector, 1);
                            self.block_ptr[slot] = 0;
                        }
                        return None;
                    }
                }
            } else {
                outer.get(child_index)
            };

            let Some(data) = zeroed_sector(block_device, allocator) else {
                if child_fresh {
                    allocator.release(child, 1);
                }
                if outer_fresh {
                    allocator.release(outer_sector, 1);
                    self.block_ptr[slot] = 0;
                }
                return None;
            };

            if child_fresh {
                outer.set(child_index, child);
                outer.store(outer_sector, block_device);
            }
            let mut inner = IndirectBlock::load(child, block_device);
            inner.set(self.indirect_index as usize, data);
            inner.store(child, block_device);

            self.indirect_index += 1;
            if self.indirect_index as usize == PTRS_PER_SECTOR {
                self.indirect_index = 0;
                self.doubly_indirect_index += 1;
                if self.doubly_indirect_index as usize == PTRS_PER_SECTOR {
                    self.direct_index += 1;
                }
            }
        } else {
            return None;
        }

        Some(())
    }

    /// 取 `slot` 指向的索引块，没有就分配一个；同时返回它是否是新分配的
    fn index_block(
        &mut self,
        slot: usize,
        block_device: &Arc<dyn BlockDevice>,
        allocator: &mut dyn SectorAllocator,
    ) -> Option<(u32, bool)> {
        if self.block_ptr[slot] != 0 {
            return Some((self.block_ptr[slot], false));
        }
        let sector = zeroed_sector(block_device, allocator)?;
        self.block_ptr[slot] = sector;
        Some((sector, true))
    }

    /// 归还所有数据块与索引块，记录恢复为空文件，返回归还的扇区数
    pub fn release(
        &mut self,
        block_device: &Arc<dyn BlockDevice>,
        allocator: &mut dyn SectorAllocator,
    ) -> usize {
        let mut drop_sectors: Vec<u32> = Vec::with_capacity(Self::count_total_sectors(self.length));

        for (slot, &sector) in self.block_ptr.iter().enumerate() {
            if sector == 0 {
                continue;
            }
            if slot == DOUBLY_SLOT {
                for child in IndirectBlock::load(sector, block_device).assigned() {
                    drop_sectors.extend(IndirectBlock::load(child, block_device).assigned());
                    drop_sectors.push(child);
                }
            } else if slot >= INDIRECT_SLOT {
                drop_sectors.extend(IndirectBlock::load(sector, block_device).assigned());
            }
            drop_sectors.push(sector);
        }

        for &sector in &drop_sectors {
            allocator.release(sector, 1);
        }
        *self = Self::default();
        drop_sectors.len()
    }

    /// 从指定位置(字节偏移)读出数据填充`buf`，到文件末尾为止
    pub fn read_at(
        &self,
        offset: u32,
        buf: &mut [u8],
        block_device: &Arc<dyn BlockDevice>,
    ) -> usize {
        let length = self.length as usize;
        let mut offset = offset as usize;
        let mut read_size = 0;
        let mut bounce: Option<Sector> = None;

        while read_size < buf.len() && offset < length {
            let Some(sector) = self.lookup(offset as u32, block_device) else {
                break;
            };
            let sector_ofs = offset % SECTOR_SIZE;
            let chunk = (buf.len() - read_size)
                .min(length - offset)
                .min(SECTOR_SIZE - sector_ofs);

            let whole = if chunk == SECTOR_SIZE {
                buf[read_size..].first_chunk_mut::<SECTOR_SIZE>()
            } else {
                None
            };
            match whole {
                // 整扇区直接读进调用者的缓冲区
                Some(dest) => block_device.read_sector(sector, dest),
                None => {
                    let bounce = bounce.get_or_insert([0; SECTOR_SIZE]);
                    block_device.read_sector(sector, bounce);
                    buf[read_size..read_size + chunk]
                        .copy_from_slice(&bounce[sector_ofs..sector_ofs + chunk]);
                }
            }

            read_size += chunk;
            offset += chunk;
        }

        read_size
    }

    /// 在文件现有长度内写入，不负责增长
    pub fn write_at(&self, offset: u32, buf: &[u8], block_device: &Arc<dyn BlockDevice>) -> usize {
        let length = self.length as usize;
        let mut offset = offset as usize;
        let mut written_size = 0;
        let mut bounce: Option<Sector> = None;

        while written_size < buf.len() && offset < length {
            let Some(sector) = self.lookup(offset as u32, block_device) else {
                break;
            };
            let sector_ofs = offset % SECTOR_SIZE;
            let chunk = (buf.len() - written_size)
                .min(length - offset)
                .min(SECTOR_SIZE - sector_ofs);

            let whole = if chunk == SECTOR_SIZE {
                buf[written_size..].first_chunk::<SECTOR_SIZE>()
            } else {
                None
            };
            match whole {
                Some(src) => block_device.write_sector(sector, src),
                None => {
                    let bounce = bounce.get_or_insert([0; SECTOR_SIZE]);
                    // 从扇区开头写到文件末尾时，扇区内剩下的字节不可见，无需读出旧内容
                    if sector_ofs == 0 && offset + chunk >= length {
                        bounce.fill(0);
                    } else {
                        block_device.read_sector(sector, bounce);
                    }
                    bounce[sector_ofs..sector_ofs + chunk]
                        .copy_from_slice(&buf[written_size..written_size + chunk]);
                    block_device.write_sector(sector, bounce);
                }
            }

            written_size += chunk;
            offset += chunk;
        }

        written_size
    }

    /// 计算容纳指定数据量需要多少个**数据扇区**
    #[inline]
    pub fn count_data_sectors(length: u32) -> usize {
        (length as usize).div_ceil(SECTOR_SIZE)
    }

    /// 计算容纳指定数据量需要多少个 **数据扇区** 和 **索引块**
    pub fn count_total_sectors(length: u32) -> usize {
        let data_sectors = Self::count_data_sectors(length).min(DOUBLY_END);
        let mut total = data_sectors;

        // 超出直接索引，使用一级索引块
        if data_sectors > DIRECT_END {
            total += (data_sectors.min(INDIRECT_END) - DIRECT_END).div_ceil(PTRS_PER_SECTOR);
        }

        // 超出一级索引，使用二级索引块及其子块
        if data_sectors > INDIRECT_END {
            total += 1 + (data_sectors - INDIRECT_END).div_ceil(PTRS_PER_SECTOR);
        }

        total
    }
}

/// 分配一个扇区并清零
fn zeroed_sector(
    block_device: &Arc<dyn BlockDevice>,
    allocator: &mut dyn SectorAllocator,
) -> Option<u32> {
    let sector = allocator.allocate(1)?;
    block_device.write_sector(sector, &[0; SECTOR_SIZE]);
    Some(sector)
}
