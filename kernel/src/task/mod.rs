//! # 进程
//!
//! 每个进程在自己的宿主线程上运行程序，线程局部变量记录当前进程。
//! 父子进程之间通过 [`ProcessStatus`] 交接加载结果与退出码。

mod loader;
mod process;
pub mod processor;
mod status;

pub use self::{
    loader::{Entry, Loader, Terminated},
    process::{Process, ProcessInner},
    status::ProcessStatus,
};
