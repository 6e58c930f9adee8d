use crate::mem;
use crate::syscall::*;

pub fn create(path: &str, initial_size: u32) -> bool {
    sys_create(mem::push_str(path), initial_size) == 1
}

pub fn remove(path: &str) -> bool {
    sys_remove(mem::push_str(path)) == 1
}

pub fn open(path: &str) -> Option<usize> {
    sys_open(mem::push_str(path)).status()
}

pub fn close(fd: usize) {
    sys_close(fd as u32);
}

pub fn filesize(fd: usize) -> Option<usize> {
    sys_filesize(fd as u32).status()
}

pub fn read(fd: usize, buf: &mut [u8]) -> Option<usize> {
    let va = mem::scratch(buf.len());
    let size = sys_read(fd as u32, va, buf.len() as u32).status()?;
    mem::load(va, &mut buf[..size]);
    Some(size)
}

pub fn write(fd: usize, buf: &[u8]) -> Option<usize> {
    sys_write(fd as u32, mem::push_bytes(buf), buf.len() as u32).status()
}

pub fn seek(fd: usize, pos: u32) {
    sys_seek(fd as u32, pos);
}

pub fn tell(fd: usize) -> Option<usize> {
    sys_tell(fd as u32).status()
}
