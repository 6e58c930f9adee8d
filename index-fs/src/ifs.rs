//! # 文件系统层
//!
//! 构建出磁盘的布局并使用，提供按名字的创建、打开与删除。

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use block_dev::BlockDevice;
use spin::Mutex;

use crate::dir::Directory;
use crate::inode::OpenInode;
use crate::layout::{DirEntry, DiskInode, SuperBlock};
use crate::{Error, FreeMap, Inode, SectorAllocator};

/// 根目录初始可容纳的项数
const ROOT_DIR_ENTRIES: u32 = 16;

pub struct IndexFileSystem {
    pub(crate) block_device: Arc<dyn BlockDevice>,
    pub(crate) free_map: Mutex<Box<dyn SectorAllocator>>,
    /// 打开的 inode 注册表，以所在扇区为键
    pub(crate) open_inodes: Mutex<BTreeMap<u32, Arc<OpenInode>>>,
    root_dir_sector: u32,
    /// 串行化按名字的操作
    namespace: Mutex<()>,
}

impl IndexFileSystem {
    /// 在整个设备上建立新的文件系统
    pub fn format(block_device: Arc<dyn BlockDevice>) -> Arc<Self> {
        let total_sectors = block_device.sector_count();
        let super_block = SuperBlock::new(total_sectors, FreeMap::sectors_needed(total_sectors));

        let mut free_map = FreeMap::format(
            block_device.clone(),
            super_block.free_map_start,
            total_sectors,
        );
        free_map.reserve(SuperBlock::SECTOR);
        for sector in super_block.free_map_start..super_block.root_dir_sector {
            free_map.reserve(sector);
        }
        free_map.reserve(super_block.root_dir_sector);

        let root_length = ROOT_DIR_ENTRIES * DirEntry::SIZE as u32;
        let Some(root_dir) = DiskInode::create(root_length, &block_device, &mut free_map) else {
            panic!("{total_sectors} sectors are too few for an index-fs volume");
        };
        root_dir.store(super_block.root_dir_sector, &block_device);
        super_block.store(&block_device);
        log::info!(
            "formatted index-fs: {total_sectors} sectors, {} free",
            free_map.free_count()
        );

        Self::assemble(block_device, free_map, super_block.root_dir_sector)
    }

    /// 挂载设备上已有的文件系统
    pub fn mount(block_device: Arc<dyn BlockDevice>) -> Arc<Self> {
        let super_block = SuperBlock::load(&block_device);
        assert!(super_block.is_valid(), "error when loading index-fs");

        let free_map = FreeMap::load(
            block_device.clone(),
            super_block.free_map_start,
            super_block.total_sectors,
        );
        log::info!(
            "mounted index-fs: {} sectors, {} free",
            super_block.total_sectors,
            free_map.free_count()
        );

        Self::assemble(block_device, free_map, super_block.root_dir_sector)
    }

    fn assemble(
        block_device: Arc<dyn BlockDevice>,
        free_map: FreeMap,
        root_dir_sector: u32,
    ) -> Arc<Self> {
        Arc::new(Self {
            block_device,
            free_map: Mutex::new(Box::new(free_map)),
            open_inodes: Mutex::new(BTreeMap::new()),
            root_dir_sector,
            namespace: Mutex::new(()),
        })
    }

    #[inline]
    pub fn block_device(&self) -> &Arc<dyn BlockDevice> {
        &self.block_device
    }

    /// 剩余的空闲扇区数
    pub fn free_sectors(&self) -> usize {
        self.free_map.lock().free_count()
    }

    /// 当前打开的不同 inode 个数
    pub fn open_inode_count(&self) -> usize {
        self.open_inodes.lock().len()
    }

    /// 在 `sector` 上建立长度为 `length` 的 inode；空间不足时不留下任何痕迹
    pub fn create_inode(&self, sector: u32, length: u32) -> bool {
        let mut free_map = self.free_map.lock();
        let Some(disk_inode) = DiskInode::create(length, &self.block_device, &mut **free_map)
        else {
            return false;
        };
        drop(free_map);

        disk_inode.store(sector, &self.block_device);
        true
    }

    #[inline]
    pub fn open_inode(self: &Arc<Self>, sector: u32) -> Inode {
        Inode::open(self, sector)
    }

    fn root_dir(self: &Arc<Self>) -> Directory {
        Directory::new(self.open_inode(self.root_dir_sector))
    }

    /// 创建初始长度为 `initial_size` 的文件
    pub fn create(self: &Arc<Self>, name: &str, initial_size: u32) -> Result<(), Error> {
        DirEntry::check_name(name)?;
        let _namespace = self.namespace.lock();
        let root_dir = self.root_dir();
        if root_dir.lookup(name).is_some() {
            return Err(Error::AlreadyExists);
        }

        let sector = self.free_map.lock().allocate(1).ok_or(Error::NoSpace)?;
        if !self.create_inode(sector, initial_size) {
            self.free_map.lock().release(sector, 1);
            return Err(Error::NoSpace);
        }

        if let Err(err) = root_dir.add(name, sector) {
            let mut disk_inode = DiskInode::load(sector, &self.block_device);
            let mut free_map = self.free_map.lock();
            disk_inode.release(&self.block_device, &mut **free_map);
            free_map.release(sector, 1);
            return Err(err);
        }

        log::debug!("created {name} at sector {sector} with {initial_size} bytes");
        Ok(())
    }

    pub fn open(self: &Arc<Self>, name: &str) -> Result<Inode, Error> {
        DirEntry::check_name(name).map_err(|_| Error::NotFound)?;
        let _namespace = self.namespace.lock();
        let sector = self.root_dir().lookup(name).ok_or(Error::NotFound)?;
        Ok(self.open_inode(sector))
    }

    /// 删除名字；已打开的文件仍可使用，直到最后一个打开者关闭
    pub fn remove(self: &Arc<Self>, name: &str) -> Result<(), Error> {
        DirEntry::check_name(name).map_err(|_| Error::NotFound)?;
        let _namespace = self.namespace.lock();
        let sector = self.root_dir().remove(name).ok_or(Error::NotFound)?;
        self.open_inode(sector).remove();

        log::debug!("removed {name}");
        Ok(())
    }

    /// 根目录下所有文件名
    pub fn list(self: &Arc<Self>) -> Vec<String> {
        let _namespace = self.namespace.lock();
        self.root_dir()
            .entries()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }
}
