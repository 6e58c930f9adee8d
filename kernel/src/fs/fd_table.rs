use std::collections::BTreeMap;
use std::sync::Arc;

use super::FileHandle;
use crate::config::FIRST_FD;

/// 进程的文件描述符表
pub struct FileTable {
    files: BTreeMap<usize, Arc<FileHandle>>,
    /// 下一个分配出去的描述符，只增不减
    next_fd: usize,
}

impl FileTable {
    pub fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            next_fd: FIRST_FD,
        }
    }

    /// 登记打开的文件，返回新的描述符
    pub fn insert(&mut self, file: Arc<FileHandle>) -> usize {
        let fd = self.next_fd;
        self.next_fd += 1;
        self.files.insert(fd, file);
        fd
    }

    pub fn get(&self, fd: usize) -> Option<Arc<FileHandle>> {
        self.files.get(&fd).cloned()
    }

    pub fn remove(&mut self, fd: usize) -> Option<Arc<FileHandle>> {
        self.files.remove(&fd)
    }

    /// 关闭全部文件
    pub fn clear(&mut self) {
        self.files.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Default for FileTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use block_dev::RamDisk;
    use index_fs::IndexFileSystem;

    use super::*;
    use crate::fs::File;

    #[test]
    fn descriptors_are_never_reused() {
        let fs = IndexFileSystem::format(Arc::new(RamDisk::new(128)));
        fs.create("a", 0).unwrap();

        let mut table = FileTable::new();
        let first = table.insert(Arc::new(FileHandle::new(fs.open("a").unwrap())));
        let second = table.insert(Arc::new(FileHandle::new(fs.open("a").unwrap())));
        assert_eq!((first, second), (FIRST_FD, FIRST_FD + 1));

        assert!(table.remove(first).is_some());
        assert!(table.remove(first).is_none());
        let third = table.insert(Arc::new(FileHandle::new(fs.open("a").unwrap())));
        assert_eq!(third, FIRST_FD + 2);
        assert_eq!(table.len(), 2);

        table.clear();
        assert!(table.is_empty());
        assert_eq!(fs.open_inode_count(), 0);
    }

    #[test]
    fn handles_keep_their_own_offsets() {
        let fs = IndexFileSystem::format(Arc::new(RamDisk::new(128)));
        fs.create("a", 0).unwrap();
        let writer = FileHandle::new(fs.open("a").unwrap());
        let reader = FileHandle::new(fs.open("a").unwrap());

        assert_eq!(writer.write(b"hello world"), 11);
        assert_eq!(writer.tell(), 11);
        assert_eq!(reader.tell(), 0);

        let mut buf = [0; 5];
        assert_eq!(reader.read(&mut buf), 5);
        assert_eq!(&buf, b"hello");
        assert_eq!(reader.tell(), 5);

        reader.seek(100);
        assert_eq!(reader.read(&mut buf), 0);
        assert_eq!(reader.tell(), 100);
        assert_eq!(reader.len(), 11);
    }
}
