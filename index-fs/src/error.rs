use core::fmt;

/// 按名字操作文件时可能出现的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    AlreadyExists,
    NotFound,
    InvalidName,
    NoSpace,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::AlreadyExists => "file already exists",
            Self::NotFound => "no such file",
            Self::InvalidName => "invalid file name",
            Self::NoSpace => "no space left on device",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for Error {}
