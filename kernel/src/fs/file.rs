use index_fs::Inode;
use spin::Mutex;

use super::File;

/// 进程打开的普通文件：共享的 inode 加上独立的读写位置
pub struct FileHandle {
    inode: Inode,
    offset: Mutex<u32>,
}

impl FileHandle {
    pub fn new(inode: Inode) -> Self {
        Self {
            inode,
            offset: Mutex::new(0),
        }
    }

    /// 可以越过文件末尾，之后的写入会扩展文件
    pub fn seek(&self, pos: u32) {
        *self.offset.lock() = pos;
    }

    pub fn tell(&self) -> u32 {
        *self.offset.lock()
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.inode.length()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl File for FileHandle {
    fn read(&self, buf: &mut [u8]) -> usize {
        let mut offset = self.offset.lock();
        let size = self.inode.read_at(buf, *offset);
        *offset += size as u32;
        size
    }

    fn write(&self, buf: &[u8]) -> usize {
        let mut offset = self.offset.lock();
        let size = self.inode.write_at(buf, *offset);
        *offset += size as u32;
        size
    }
}
