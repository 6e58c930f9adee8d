//! # 用户地址空间
//!
//! 用户进程只能访问 [`PHYS_BASE`] 以下、已映射且带有 `U` 权限的页；
//! 内核在解引用用户给出的任何地址之前都要先经过这里的检查。
//!
//! [`PHYS_BASE`]: crate::config::PHYS_BASE

mod address;
mod address_space;
mod buffer;

pub use self::{
    address::{VirtAddr, VirtPageNum},
    address_space::{AddressSpace, MapPermission},
    buffer::UserBuffer,
};
