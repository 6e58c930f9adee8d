/// 程序入口，参数为完整的命令行参数（含程序名），返回退出码
pub type Entry = Box<dyn FnOnce(&[String]) -> i32 + Send>;

/// 把文件系统中的程序映像变成可运行的入口
pub trait Loader: Send + Sync {
    /// 映像无法识别时返回空
    fn load(&self, name: &str, image: &[u8]) -> Option<Entry>;
}

/// 被内核终止的程序以此为载荷展开，不再回到用户代码
#[derive(Debug)]
pub struct Terminated;
