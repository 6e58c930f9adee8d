use alloc::string::String;

use crate::Error;

/// 文件名的最大长度（字节）
pub const NAME_MAX_LEN: usize = 27;

/// 文件项的元信息
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirEntry {
    // 最后一字节留给 \0
    name: [u8; NAME_MAX_LEN + 1],
    sector: u32,
}

impl DirEntry {
    /// 元信息大小恒为32字节
    pub const SIZE: usize = 32;

    /// 名字须非空、不超过 [`NAME_MAX_LEN`]，且不含 `/` 与 `\0`
    pub fn new(name: &str, sector: u32) -> Result<Self, Error> {
        Self::check_name(name)?;
        let bytes = name.as_bytes();
        let mut raw = [0; NAME_MAX_LEN + 1];
        raw[..bytes.len()].copy_from_slice(bytes);

        Ok(Self { name: raw, sector })
    }

    pub fn check_name(name: &str) -> Result<(), Error> {
        if name.is_empty() || name.len() > NAME_MAX_LEN || name.contains(['/', '\0']) {
            return Err(Error::InvalidName);
        }
        Ok(())
    }

    pub fn name(&self) -> String {
        let len = self.name.iter().position(|&c| c == 0).unwrap_or(NAME_MAX_LEN);
        String::from_utf8_lossy(&self.name[..len]).into_owned()
    }

    /// 名字为空的项是空槽位
    #[inline]
    pub fn is_free(&self) -> bool {
        self.name[0] == 0
    }

    #[inline]
    pub fn sector(&self) -> u32 {
        self.sector
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0; Self::SIZE];
        bytes[..NAME_MAX_LEN + 1].copy_from_slice(&self.name);
        bytes[NAME_MAX_LEN + 1..].copy_from_slice(&self.sector.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        let mut name = [0; NAME_MAX_LEN + 1];
        name.copy_from_slice(&bytes[..NAME_MAX_LEN + 1]);
        let sector = u32::from_le_bytes([bytes[28], bytes[29], bytes[30], bytes[31]]);
        Self { name, sector }
    }
}
