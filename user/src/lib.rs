//! # 用户库
//!
//! 用户程序经由这里的系统调用封装进入内核。
//! 传给内核的字符串与缓冲区都先放进用户数据段，内核只认用户地址。

#[macro_use]
pub mod console;

pub mod fs;
pub mod mem;
pub mod process;
mod program;
pub mod syscall;

pub use self::program::{Program, ProgramTable};
