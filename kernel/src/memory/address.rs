//! 32 位用户虚拟地址的约定

use std::fmt;

use crate::config::{PAGE_SIZE, PAGE_SIZE_BITS, PHYS_BASE};

/// 虚拟地址
/// - [12:31] 虚拟页号
/// - [0:11]  页内偏移
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VirtAddr(usize);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VirtPageNum(pub usize);

impl VirtAddr {
    #[inline]
    pub fn page_number(&self) -> VirtPageNum {
        VirtPageNum(self.0 >> PAGE_SIZE_BITS)
    }

    #[inline]
    pub fn page_offset(&self) -> usize {
        self.0 & (PAGE_SIZE - 1)
    }

    /// 非空且位于用户空间
    #[inline]
    pub fn is_user(&self) -> bool {
        self.0 != 0 && self.0 < PHYS_BASE
    }
}

impl VirtPageNum {
    /// 页的首地址
    #[inline]
    pub fn base(&self) -> VirtAddr {
        VirtAddr(self.0 << PAGE_SIZE_BITS)
    }
}

impl From<usize> for VirtAddr {
    fn from(va: usize) -> Self {
        Self(va)
    }
}

impl From<VirtAddr> for usize {
    fn from(va: VirtAddr) -> Self {
        va.0
    }
}

impl fmt::Debug for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VA:{:#x}", self.0)
    }
}
