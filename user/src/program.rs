//! 可执行映像：魔数后跟程序名，加载时按名字找到程序

use std::collections::BTreeMap;
use std::sync::Arc;

use index_fs::IndexFileSystem;
use kernel::task::{Entry, Loader};

const IMAGE_MAGIC: &[u8; 4] = b"\x7fPRG";

/// 用户程序，参数包含程序名，返回退出码
pub type Program = Arc<dyn Fn(&[String]) -> i32 + Send + Sync>;

#[derive(Default, Clone)]
pub struct ProgramTable {
    programs: BTreeMap<String, Program>,
}

impl ProgramTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        mut self,
        name: &str,
        program: impl Fn(&[String]) -> i32 + Send + Sync + 'static,
    ) -> Self {
        self.programs.insert(name.to_string(), Arc::new(program));
        self
    }

    pub fn image(name: &str) -> Vec<u8> {
        let mut image = IMAGE_MAGIC.to_vec();
        image.extend_from_slice(name.as_bytes());
        image
    }

    /// 把所有程序的映像写入文件系统
    pub fn install(&self, fs: &Arc<IndexFileSystem>) -> Result<(), index_fs::Error> {
        for name in self.programs.keys() {
            let image = Self::image(name);
            fs.create(name, 0)?;
            let written = fs.open(name)?.write_at(&image, 0);
            if written < image.len() {
                return Err(index_fs::Error::NoSpace);
            }
        }
        Ok(())
    }
}

impl Loader for ProgramTable {
    fn load(&self, name: &str, image: &[u8]) -> Option<Entry> {
        let Some(target) = image.strip_prefix(IMAGE_MAGIC) else {
            log::warn!("{name} is not an executable");
            return None;
        };
        let program = self.programs.get(core::str::from_utf8(target).ok()?)?.clone();
        Some(Box::new(move |args: &[String]| program(args)))
    }
}
