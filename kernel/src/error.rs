use std::fmt;

/// 系统调用处理中会导致进程被终止的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// 用户传入的地址为空、越入内核空间或未映射
    BadAddress(usize),
    UnknownSyscall(u32),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadAddress(addr) => write!(f, "bad user address {addr:#x}"),
            Self::UnknownSyscall(id) => write!(f, "unsupported syscall {id}"),
        }
    }
}

impl std::error::Error for KernelError {}
