//! 原始系统调用：调用号与参数以 32 位字压在用户栈顶

use std::panic;

use kernel::config::USER_STACK_TOP;
use kernel::task::{Terminated, processor};
use kernel::trap::{self, Disposition, TrapFrame};

pub const HALT: u32 = 0;
pub const EXIT: u32 = 1;
pub const EXEC: u32 = 2;
pub const WAIT: u32 = 3;
pub const CREATE: u32 = 4;
pub const REMOVE: u32 = 5;
pub const OPEN: u32 = 6;
pub const FILESIZE: u32 = 7;
pub const READ: u32 = 8;
pub const WRITE: u32 = 9;
pub const SEEK: u32 = 10;
pub const TELL: u32 = 11;
pub const CLOSE: u32 = 12;

/// 压栈后陷入
pub fn syscall(id: u32, args: &[u32]) -> isize {
    let frame: Vec<u8> = [id]
        .iter()
        .chain(args)
        .flat_map(|word| word.to_le_bytes())
        .collect();
    let esp = USER_STACK_TOP - frame.len();

    // 压栈失败时内核读取参数会发现同样的问题
    let _ = processor::current_process()
        .inner()
        .lock()
        .address_space
        .write(esp, &frame);

    trap(esp as u32)
}

/// 以给定的栈指针陷入内核；进程被终止时直接展开，不再返回
pub fn trap(esp: u32) -> isize {
    let mut frame = TrapFrame::new(esp);
    match trap::trap_handler(&mut frame) {
        Disposition::Resume => frame.eax as i32 as isize,
        Disposition::Terminate => panic::resume_unwind(Box::new(Terminated)),
    }
}

/// 访问非法地址
pub(crate) fn fault(addr: usize) -> ! {
    trap::page_fault(addr);
    panic::resume_unwind(Box::new(Terminated))
}

/// 把系统调用的返回值转换为结果，负数表示失败
pub trait SyscallStatus {
    fn status(self) -> Option<usize>;
}

impl SyscallStatus for isize {
    #[inline]
    fn status(self) -> Option<usize> {
        usize::try_from(self).ok()
    }
}

pub fn sys_halt() -> ! {
    syscall(HALT, &[]);
    unreachable!()
}

pub fn sys_exit(exit_code: i32) -> ! {
    syscall(EXIT, &[exit_code as u32]);
    unreachable!()
}

pub fn sys_exec(cmd_line: u32) -> isize {
    syscall(EXEC, &[cmd_line])
}

pub fn sys_wait(pid: i32) -> isize {
    syscall(WAIT, &[pid as u32])
}

pub fn sys_create(path: u32, size: u32) -> isize {
    syscall(CREATE, &[path, size])
}

pub fn sys_remove(path: u32) -> isize {
    syscall(REMOVE, &[path])
}

pub fn sys_open(path: u32) -> isize {
    syscall(OPEN, &[path])
}

pub fn sys_filesize(fd: u32) -> isize {
    syscall(FILESIZE, &[fd])
}

pub fn sys_read(fd: u32, buf: u32, len: u32) -> isize {
    syscall(READ, &[fd, buf, len])
}

pub fn sys_write(fd: u32, buf: u32, len: u32) -> isize {
    syscall(WRITE, &[fd, buf, len])
}

pub fn sys_seek(fd: u32, pos: u32) -> isize {
    syscall(SEEK, &[fd, pos])
}

pub fn sys_tell(fd: u32) -> isize {
    syscall(TELL, &[fd])
}

pub fn sys_close(fd: u32) -> isize {
    syscall(CLOSE, &[fd])
}
