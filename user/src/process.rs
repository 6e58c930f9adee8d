use crate::mem;
use crate::syscall::*;

pub fn exit(exit_code: i32) -> ! {
    sys_exit(exit_code)
}

/// 关机，所有进程都将被终止
pub fn halt() -> ! {
    sys_halt()
}

/// 结果：
/// None => 程序不存在或无法加载
pub fn exec(cmd_line: &str) -> Option<usize> {
    sys_exec(mem::push_str(cmd_line)).status()
}

/// 等待子进程结束，返回其退出码；
/// 不是子进程或已经等待过时返回 -1
pub fn wait(pid: usize) -> i32 {
    sys_wait(pid as i32) as i32
}
