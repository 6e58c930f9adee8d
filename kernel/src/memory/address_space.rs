use std::collections::BTreeMap;

use enumflags2::{BitFlags, bitflags};

use super::{VirtAddr, VirtPageNum};
use crate::KernelError;
use crate::config::{PAGE_SIZE, USER_DATA_BASE, USER_DATA_SIZE, USER_STACK_SIZE, USER_STACK_TOP};

#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapPermission {
    R = 0b0000_0010,
    W = 0b0000_0100,
    U = 0b0001_0000,
}

/// 一个已映射的页
struct Frame {
    permission: BitFlags<MapPermission>,
    bytes: Box<[u8; PAGE_SIZE]>,
}

/// 进程的用户地址空间，以页为粒度映射
#[derive(Default)]
pub struct AddressSpace {
    frames: BTreeMap<VirtPageNum, Frame>,
}

impl AddressSpace {
    /// 映射好用户栈与数据段的地址空间
    pub fn new_user() -> Self {
        let mut space = Self::default();
        let user_rw = MapPermission::R | MapPermission::W | MapPermission::U;
        space.map(
            VirtAddr::from(USER_STACK_TOP - USER_STACK_SIZE),
            USER_STACK_SIZE,
            user_rw,
        );
        space.map(VirtAddr::from(USER_DATA_BASE), USER_DATA_SIZE, user_rw);
        space
    }

    /// 映射覆盖 `[start, start + len)` 的所有页，新页清零
    pub fn map(&mut self, start: VirtAddr, len: usize, permission: BitFlags<MapPermission>) {
        let start = usize::from(start);
        let first = VirtAddr::from(start).page_number().0;
        let last = VirtAddr::from(start + len).page_number().0
            + usize::from(VirtAddr::from(start + len).page_offset() != 0);
        for vpn in first..last {
            self.frames.entry(VirtPageNum(vpn)).or_insert_with(|| Frame {
                permission,
                bytes: Box::new([0; PAGE_SIZE]),
            });
        }
    }

    /// 回收所有页
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn translate(&self, vpn: VirtPageNum) -> Option<BitFlags<MapPermission>> {
        self.frames.get(&vpn).map(|frame| frame.permission)
    }

    /// 检查 `[va, va + len)` 是否全部是用户可访问的内存；
    /// 出错时给出第一个不可访问的地址。
    /// 空区间也要求起始地址非空且位于用户空间。
    pub fn check(&self, va: usize, len: usize, writable: bool) -> Result<(), KernelError> {
        if !VirtAddr::from(va).is_user() {
            return Err(KernelError::BadAddress(va));
        }
        if len == 0 {
            return Ok(());
        }
        let end = va
            .checked_add(len)
            .filter(|&end| end <= USER_STACK_TOP)
            .ok_or(KernelError::BadAddress(va))?;

        let mut required = MapPermission::R | MapPermission::U;
        if writable {
            required |= MapPermission::W;
        }

        let mut addr = va;
        while addr < end {
            let page = VirtAddr::from(addr).page_number();
            match self.translate(page) {
                Some(permission) if permission.contains(required) => {}
                _ => return Err(KernelError::BadAddress(addr)),
            }
            addr = usize::from(page.base()) + PAGE_SIZE;
        }

        Ok(())
    }

    /// 读出用户内存，整段检查通过后才开始复制
    pub fn read(&self, va: usize, buf: &mut [u8]) -> Result<(), KernelError> {
        self.check(va, buf.len(), false)?;
        let mut done = 0;
        while done < buf.len() {
            let addr = VirtAddr::from(va + done);
            let offset = addr.page_offset();
            let chunk = (PAGE_SIZE - offset).min(buf.len() - done);
            let frame = self
                .frames
                .get(&addr.page_number())
                .ok_or(KernelError::BadAddress(va + done))?;
            buf[done..done + chunk].copy_from_slice(&frame.bytes[offset..offset + chunk]);
            done += chunk;
        }
        Ok(())
    }

    /// 写入用户内存，整段检查通过后才开始复制
    pub fn write(&mut self, va: usize, data: &[u8]) -> Result<(), KernelError> {
        self.check(va, data.len(), true)?;
        let mut done = 0;
        while done < data.len() {
            let addr = VirtAddr::from(va + done);
            let offset = addr.page_offset();
            let chunk = (PAGE_SIZE - offset).min(data.len() - done);
            let frame = self
                .frames
                .get_mut(&addr.page_number())
                .ok_or(KernelError::BadAddress(va + done))?;
            frame.bytes[offset..offset + chunk].copy_from_slice(&data[done..done + chunk]);
            done += chunk;
        }
        Ok(())
    }

    /// 读一个小端 32 位字，例如用户栈上的系统调用参数
    pub fn read_u32(&self, va: usize) -> Result<u32, KernelError> {
        let mut word = [0; 4];
        self.read(va, &mut word)?;
        Ok(u32::from_le_bytes(word))
    }

    /// 读以 `\0` 结尾的字符串，逐字节检查
    pub fn read_str(&self, va: usize) -> Result<String, KernelError> {
        let mut bytes = Vec::new();
        let mut addr = va;
        loop {
            let mut ch = [0];
            self.read(addr, &mut ch)?;
            if ch[0] == 0 {
                break;
            }
            bytes.push(ch[0]);
            addr += 1;
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
