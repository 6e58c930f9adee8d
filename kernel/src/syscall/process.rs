use crate::KernelError;
use crate::task::Process;

pub fn sys_exec(process: &Process, cmd_line: usize) -> Result<isize, KernelError> {
    let cmd_line = process.inner().lock().address_space.read_str(cmd_line)?;
    Ok(process.exec(&cmd_line).map_or(-1, |pid| pid as isize))
}

pub fn sys_wait(process: &Process, pid: i32) -> isize {
    if pid < 0 {
        return -1;
    }
    process.wait(pid as usize) as isize
}
