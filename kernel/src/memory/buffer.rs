use super::AddressSpace;
use crate::KernelError;

/// 一段经过检查的用户缓冲区。
///
/// 系统调用先整段检查，再放开进程锁去做 I/O，
/// 因而不会出现做了一半才发现地址非法的情况。
#[derive(Debug, Clone, Copy)]
pub struct UserBuffer {
    va: usize,
    len: usize,
}

impl UserBuffer {
    pub fn new(
        space: &AddressSpace,
        va: usize,
        len: usize,
        writable: bool,
    ) -> Result<Self, KernelError> {
        space.check(va, len, writable)?;
        Ok(Self { va, len })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 把用户数据复制进内核
    pub fn copy_in(&self, space: &AddressSpace) -> Result<Vec<u8>, KernelError> {
        let mut data = vec![0; self.len];
        space.read(self.va, &mut data)?;
        Ok(data)
    }

    /// 把内核数据复制到缓冲区开头，长度不超过缓冲区
    pub fn copy_out(&self, space: &mut AddressSpace, data: &[u8]) -> Result<(), KernelError> {
        let len = data.len().min(self.len);
        space.write(self.va, &data[..len])
    }
}
