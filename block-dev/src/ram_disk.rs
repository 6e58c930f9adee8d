use core::sync::atomic::{AtomicUsize, Ordering};

use alloc::vec;
use alloc::vec::Vec;
use spin::Mutex;

use crate::{BlockDevice, SECTOR_SIZE, Sector};

/// 内存中的块设备，主要用于测试
#[derive(Debug)]
pub struct RamDisk {
    sectors: Mutex<Vec<Sector>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl RamDisk {
    pub fn new(sector_count: u32) -> Self {
        Self {
            sectors: Mutex::new(vec![[0; SECTOR_SIZE]; sector_count as usize]),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// 已发生的扇区读次数
    #[inline]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// 已发生的扇区写次数
    #[inline]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl BlockDevice for RamDisk {
    fn read_sector(&self, sector: u32, buf: &mut Sector) {
        let sectors = self.sectors.lock();
        assert!(
            (sector as usize) < sectors.len(),
            "sector {sector} out of range"
        );
        buf.copy_from_slice(&sectors[sector as usize]);
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    fn write_sector(&self, sector: u32, buf: &Sector) {
        let mut sectors = self.sectors.lock();
        assert!(
            (sector as usize) < sectors.len(),
            "sector {sector} out of range"
        );
        sectors[sector as usize].copy_from_slice(buf);
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    fn sector_count(&self) -> u32 {
        self.sectors.lock().len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sectors_round_trip() {
        let disk = RamDisk::new(4);
        let mut data = [0; SECTOR_SIZE];
        data[0] = 0xaa;
        data[SECTOR_SIZE - 1] = 0x55;
        disk.write_sector(3, &data);

        let mut buf = [0; SECTOR_SIZE];
        disk.read_sector(3, &mut buf);
        assert_eq!(buf, data);
        disk.read_sector(2, &mut buf);
        assert_eq!(buf, [0; SECTOR_SIZE]);
        assert_eq!(disk.reads(), 2);
        assert_eq!(disk.writes(), 1);
        assert_eq!(disk.sector_count(), 4);
    }

    #[test]
    #[should_panic]
    fn out_of_range_sector_panics() {
        let disk = RamDisk::new(1);
        disk.write_sector(1, &[0; SECTOR_SIZE]);
    }
}
