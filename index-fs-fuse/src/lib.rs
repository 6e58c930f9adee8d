
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Mutex;

use block_dev::{BlockDevice, SECTOR_SIZE, Sector};

/// 以宿主机上的映像文件充当块设备
pub struct BlockFile {
    file: Mutex<File>,
    sectors: u32,
}

impl BlockFile {
    /// 新建（或清空）映像文件，大小为 `sectors` 个扇区
    pub fn create(path: impl AsRef<Path>, sectors: u32) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(sectors as u64 * SECTOR_SIZE as u64)?;
        Ok(Self {
            file: Mutex::new(file),
            sectors,
        })
    }

    /// 打开已有的映像，末尾不足一个扇区的部分不用
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let sectors = u32::try_from(file.metadata()?.len() / SECTOR_SIZE as u64)
            .map_err(|_| io::Error::other("image is too large"))?;
        Ok(Self {
            file: Mutex::new(file),
            sectors,
        })
    }
}

impl BlockDevice for BlockFile {
    fn read_sector(&self, sector: u32, buf: &mut Sector) {
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start(sector as u64 * SECTOR_SIZE as u64))
            .expect("seeking error");
        file.read_exact(buf).expect("not a complete sector!");
    }

    fn write_sector(&self, sector: u32, buf: &Sector) {
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start(sector as u64 * SECTOR_SIZE as u64))
            .expect("seeking error");
        file.write_all(buf).expect("not a complete sector!");
    }

    fn sector_count(&self) -> u32 {
        self.sectors
    }
}
