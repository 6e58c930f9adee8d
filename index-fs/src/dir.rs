//! 平坦的根目录：目录的数据就是一串 [`DirEntry`]

use alloc::string::String;
use alloc::vec::Vec;

use crate::layout::DirEntry;
use crate::{Error, Inode};

pub(crate) struct Directory {
    inode: Inode,
}

impl Directory {
    #[inline]
    pub fn new(inode: Inode) -> Self {
        Self { inode }
    }

    /// 依次读出每个目录项及其偏移
    fn slots(&self) -> impl Iterator<Item = (u32, DirEntry)> + '_ {
        (0..self.inode.length())
            .step_by(DirEntry::SIZE)
            .map_while(|offset| {
                let mut bytes = [0; DirEntry::SIZE];
                (self.inode.read_at(&mut bytes, offset) == DirEntry::SIZE)
                    .then(|| (offset, DirEntry::from_bytes(&bytes)))
            })
    }

    /// 根据文件名获取 inode 所在扇区
    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.slots()
            .find(|(_, entry)| !entry.is_free() && entry.name() == name)
            .map(|(_, entry)| entry.sector())
    }

    /// 登记新项：优先复用空槽位，找不到就追加在末尾
    pub fn add(&self, name: &str, sector: u32) -> Result<(), Error> {
        let entry = DirEntry::new(name, sector)?;
        if self.lookup(name).is_some() {
            return Err(Error::AlreadyExists);
        }

        let offset = self
            .slots()
            .find(|(_, entry)| entry.is_free())
            .map_or(self.inode.length(), |(offset, _)| offset);
        if self.inode.write_at(&entry.to_bytes(), offset) != DirEntry::SIZE {
            return Err(Error::NoSpace);
        }

        Ok(())
    }

    /// 删除目录项并返回其 inode 所在扇区
    pub fn remove(&self, name: &str) -> Option<u32> {
        let (offset, entry) = self
            .slots()
            .find(|(_, entry)| !entry.is_free() && entry.name() == name)?;
        self.inode.write_at(&[0; DirEntry::SIZE], offset);
        Some(entry.sector())
    }

    pub fn entries(&self) -> Vec<(String, u32)> {
        self.slots()
            .filter(|(_, entry)| !entry.is_free())
            .map(|(_, entry)| (entry.name(), entry.sector()))
            .collect()
    }
}
