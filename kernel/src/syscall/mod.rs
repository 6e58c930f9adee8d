//! # 系统调用
//!
//! 调用号在 `esp` 处，第 i 个参数是 `esp + 4(i+1)` 处的 32 位字。
//! 每个字在读取前都要检查；任何非法地址都会让调用者被终止。

mod fs;
mod process;

use self::fs::*;
use self::process::*;
use crate::KernelError;
use crate::task::Process;

const HALT: u32 = 0;
const EXIT: u32 = 1;
const EXEC: u32 = 2;
const WAIT: u32 = 3;
const CREATE: u32 = 4;
const REMOVE: u32 = 5;
const OPEN: u32 = 6;
const FILESIZE: u32 = 7;
const READ: u32 = 8;
const WRITE: u32 = 9;
const SEEK: u32 = 10;
const TELL: u32 = 11;
const CLOSE: u32 = 12;

/// 系统调用的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// 写入 `eax` 后返回用户态
    Return(isize),
    Exit(i32),
    Halt,
}

/// 用户栈上的参数，按需读取
struct Args<'a> {
    process: &'a Process,
    esp: usize,
}

impl Args<'_> {
    fn word(&self, index: usize) -> Result<u32, KernelError> {
        let va = self.esp + 4 * index;
        self.process.inner().lock().address_space.read_u32(va)
    }

    /// 第 `index` 个参数
    #[inline]
    fn arg(&self, index: usize) -> Result<u32, KernelError> {
        self.word(index + 1)
    }
}

pub fn syscall(process: &Process, esp: usize) -> Result<Control, KernelError> {
    let args = Args { process, esp };
    let id = args.word(0)?;

    let ret = match id {
        HALT => return Ok(Control::Halt),
        EXIT => return Ok(Control::Exit(args.arg(0)? as i32)),
        EXEC => sys_exec(process, args.arg(0)? as usize)?,
        WAIT => sys_wait(process, args.arg(0)? as i32),
        CREATE => sys_create(process, args.arg(0)? as usize, args.arg(1)?)?,
        REMOVE => sys_remove(process, args.arg(0)? as usize)?,
        OPEN => sys_open(process, args.arg(0)? as usize)?,
        FILESIZE => sys_filesize(process, args.arg(0)? as usize),
        READ => sys_read(
            process,
            args.arg(0)? as usize,
            args.arg(1)? as usize,
            args.arg(2)? as usize,
        )?,
        WRITE => sys_write(
            process,
            args.arg(0)? as usize,
            args.arg(1)? as usize,
            args.arg(2)? as usize,
        )?,
        SEEK => sys_seek(process, args.arg(0)? as usize, args.arg(1)?),
        TELL => sys_tell(process, args.arg(0)? as usize),
        CLOSE => sys_close(process, args.arg(0)? as usize),
        _ => return Err(KernelError::UnknownSyscall(id)),
    };

    Ok(Control::Return(ret))
}
