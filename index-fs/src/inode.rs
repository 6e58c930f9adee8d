//! # 索引节点层
//!
//! 同一扇区上的 inode 在内存中只有一份 [`OpenInode`]，登记在文件系统的注册表里，
//! 所有打开者共享它的长度、删除标记与禁写计数。
//! 每个打开者持有一个 [`Inode`] 句柄，句柄析构即关闭。
//!
//! 加锁顺序：注册表 -> inode -> 空闲位图。

use alloc::sync::Arc;
use spin::Mutex;

use crate::IndexFileSystem;
use crate::MAX_FILE_SIZE;
use crate::layout::DiskInode;

/// 内存中打开的 inode
pub(crate) struct OpenInode {
    /// inode 记录所在扇区，即其身份
    sector: u32,
    state: Mutex<InodeState>,
}

struct InodeState {
    open_cnt: usize,
    /// 最后一个打开者关闭时释放
    removed: bool,
    /// 非 0 时拒绝写入
    deny_write_cnt: usize,
    disk_inode: DiskInode,
}

/// 打开者对 inode 的引用
pub struct Inode {
    inner: Arc<OpenInode>,
    fs: Arc<IndexFileSystem>,
}

impl Inode {
    /// 打开 `sector` 上的 inode：已打开则共享，否则从磁盘读入并登记
    pub(crate) fn open(fs: &Arc<IndexFileSystem>, sector: u32) -> Self {
        let mut open_inodes = fs.open_inodes.lock();

        let inner = match open_inodes.get(&sector) {
            Some(inner) => {
                inner.state.lock().open_cnt += 1;
                inner.clone()
            }
            None => {
                let disk_inode = DiskInode::load(sector, &fs.block_device);
                let inner = Arc::new(OpenInode {
                    sector,
                    state: Mutex::new(InodeState {
                        open_cnt: 1,
                        removed: false,
                        deny_write_cnt: 0,
                        disk_inode,
                    }),
                });
                open_inodes.insert(sector, inner.clone());
                log::trace!("inode {sector} loaded");
                inner
            }
        };

        Self {
            inner,
            fs: fs.clone(),
        }
    }

    /// 再打开一次同一个 inode
    pub fn reopen(&self) -> Self {
        self.inner.state.lock().open_cnt += 1;
        Self {
            inner: self.inner.clone(),
            fs: self.fs.clone(),
        }
    }

    /// 关闭此句柄，等价于丢弃它
    #[inline]
    pub fn close(self) {}

    /// inode 的编号，即其所在扇区
    #[inline]
    pub fn inumber(&self) -> u32 {
        self.inner.sector
    }

    /// 标记删除，等到最后一个打开者关闭时才真正释放
    pub fn remove(&self) {
        self.inner.state.lock().removed = true;
    }

    pub fn is_removed(&self) -> bool {
        self.inner.state.lock().removed
    }

    pub fn open_count(&self) -> usize {
        self.inner.state.lock().open_cnt
    }

    #[inline]
    pub fn length(&self) -> u32 {
        self.inner.state.lock().disk_inode.length
    }

    /// 从 `offset` 起读满 `buf`，遇到文件末尾提前结束
    pub fn read_at(&self, buf: &mut [u8], offset: u32) -> usize {
        let state = self.inner.state.lock();
        state
            .disk_inode
            .read_at(offset, buf, &self.fs.block_device)
    }

    /// 从 `offset` 起写入 `buf`，越过末尾时先扩展文件。
    /// 禁写期间返回 0；空间不足时只写入扩展到的部分。
    pub fn write_at(&self, buf: &[u8], offset: u32) -> usize {
        let mut state = self.inner.state.lock();
        if state.deny_write_cnt > 0 || offset >= MAX_FILE_SIZE {
            return 0;
        }

        let end = (offset as u64 + buf.len() as u64).min(MAX_FILE_SIZE as u64) as u32;
        if end > state.disk_inode.length {
            let mut free_map = self.fs.free_map.lock();
            state
                .disk_inode
                .grow(end, &self.fs.block_device, &mut **free_map);
            drop(free_map);
            // 索引一有变化立即写回
            state
                .disk_inode
                .store(self.inner.sector, &self.fs.block_device);
        }

        state
            .disk_inode
            .write_at(offset, buf, &self.fs.block_device)
    }

    pub fn deny_write(&self) {
        let mut state = self.inner.state.lock();
        state.deny_write_cnt += 1;
        assert!(state.deny_write_cnt <= state.open_cnt);
    }

    /// 每个调用过 [`Inode::deny_write`] 的打开者须在关闭前调用一次
    pub fn allow_write(&self) {
        let mut state = self.inner.state.lock();
        assert!(state.deny_write_cnt > 0);
        state.deny_write_cnt -= 1;
    }
}

impl Drop for Inode {
    fn drop(&mut self) {
        let mut open_inodes = self.fs.open_inodes.lock();
        let mut state = self.inner.state.lock();

        state.open_cnt -= 1;
        if state.open_cnt > 0 {
            return;
        }
        open_inodes.remove(&self.inner.sector);
        drop(open_inodes);

        if state.removed {
            let mut free_map = self.fs.free_map.lock();
            let freed = state
                .disk_inode
                .release(&self.fs.block_device, &mut **free_map);
            free_map.release(self.inner.sector, 1);
            log::debug!(
                "inode {} released with {freed} sectors",
                self.inner.sector
            );
        }
    }
}
