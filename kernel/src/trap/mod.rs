//! # 陷入处理
//!
//! 用户程序把调用号与参数压在用户栈上后陷入内核，
//! 内核解码系统调用、把返回值放进 `eax`，或者终止当前进程。

use crate::config::KILLED_EXIT_CODE;
use crate::syscall::{self, Control};
use crate::task::processor;

/// 陷入时保存的用户寄存器
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct TrapFrame {
    /// 用户栈指针，指向系统调用号
    pub esp: u32,
    /// 返回值
    pub eax: u32,
}

impl TrapFrame {
    pub fn new(esp: u32) -> Self {
        Self { esp, eax: 0 }
    }
}

/// 陷入处理完毕后的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 回到用户程序
    Resume,
    /// 进程已终止，不得再执行用户代码
    Terminate,
}

pub fn trap_handler(frame: &mut TrapFrame) -> Disposition {
    let process = processor::current_process();

    // 关机后每个进程都在下一次陷入时结束
    if process.kernel().is_halted() {
        process.exit(KILLED_EXIT_CODE);
        return Disposition::Terminate;
    }

    match syscall::syscall(&process, frame.esp as usize) {
        Ok(Control::Return(ret)) => {
            frame.eax = ret as i32 as u32;
            Disposition::Resume
        }
        Ok(Control::Exit(exit_code)) => {
            process.exit(exit_code);
            Disposition::Terminate
        }
        Ok(Control::Halt) => {
            process.kernel().halt();
            process.exit(KILLED_EXIT_CODE);
            Disposition::Terminate
        }
        Err(err) => {
            log::warn!("{}: {err}, killed", process.name());
            process.exit(KILLED_EXIT_CODE);
            Disposition::Terminate
        }
    }
}

/// 用户程序访问了不可访问的地址
pub fn page_fault(addr: usize) -> Disposition {
    let process = processor::current_process();
    log::warn!("{}: page fault at {addr:#x}, killed", process.name());
    process.exit(KILLED_EXIT_CODE);
    Disposition::Terminate
}
