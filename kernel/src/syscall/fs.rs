//! File and filesystem-related syscalls

use std::sync::Arc;

use crate::KernelError;
use crate::config::{STDIN_FILENO, STDOUT_FILENO};
use crate::fs::stdio::{Stdin, Stdout};
use crate::fs::{File, FileHandle};
use crate::memory::UserBuffer;
use crate::task::Process;

/// 描述符对应的文件，0 和 1 是控制台
fn file_of(process: &Process, fd: usize) -> Option<Arc<dyn File>> {
    let console = process.kernel().console().clone();
    match fd {
        STDIN_FILENO => Some(Arc::new(Stdin::new(console))),
        STDOUT_FILENO => Some(Arc::new(Stdout::new(console))),
        _ => process
            .inner()
            .lock()
            .fd_table
            .get(fd)
            .map(|file| file as Arc<dyn File>),
    }
}

fn handle_of(process: &Process, fd: usize) -> Option<Arc<FileHandle>> {
    process.inner().lock().fd_table.get(fd)
}

fn read_path(process: &Process, path: usize) -> Result<String, KernelError> {
    process.inner().lock().address_space.read_str(path)
}

pub fn sys_write(process: &Process, fd: usize, buf: usize, len: usize) -> Result<isize, KernelError> {
    let data = {
        let inner = process.inner().lock();
        UserBuffer::new(&inner.address_space, buf, len, false)?.copy_in(&inner.address_space)?
    };

    let Some(file) = file_of(process, fd) else {
        return Ok(-1);
    };
    if !file.writable() {
        return Ok(-1);
    }

    Ok(file.write(&data) as isize)
}

pub fn sys_read(process: &Process, fd: usize, buf: usize, len: usize) -> Result<isize, KernelError> {
    let buffer = {
        let inner = process.inner().lock();
        UserBuffer::new(&inner.address_space, buf, len, true)?
    };

    let Some(file) = file_of(process, fd) else {
        return Ok(-1);
    };
    if !file.readable() {
        return Ok(-1);
    }

    let mut data = vec![0; buffer.len()];
    let size = file.read(&mut data);
    buffer.copy_out(&mut process.inner().lock().address_space, &data[..size])?;
    Ok(size as isize)
}

pub fn sys_create(process: &Process, path: usize, size: u32) -> Result<isize, KernelError> {
    let path = read_path(process, path)?;
    let created = process.kernel().fs().create(&path, size);
    if let Err(err) = &created {
        log::debug!("create {path:?}: {err}");
    }
    Ok(created.is_ok() as isize)
}

pub fn sys_remove(process: &Process, path: usize) -> Result<isize, KernelError> {
    let path = read_path(process, path)?;
    Ok(process.kernel().fs().remove(&path).is_ok() as isize)
}

pub fn sys_open(process: &Process, path: usize) -> Result<isize, KernelError> {
    let path = read_path(process, path)?;

    let Ok(inode) = process.kernel().fs().open(&path) else {
        return Ok(-1);
    };

    let fd = process
        .inner()
        .lock()
        .fd_table
        .insert(Arc::new(FileHandle::new(inode)));
    Ok(fd as isize)
}

pub fn sys_filesize(process: &Process, fd: usize) -> isize {
    handle_of(process, fd).map_or(-1, |file| file.len() as isize)
}

pub fn sys_seek(process: &Process, fd: usize, pos: u32) -> isize {
    if let Some(file) = handle_of(process, fd) {
        file.seek(pos);
    }
    0
}

pub fn sys_tell(process: &Process, fd: usize) -> isize {
    handle_of(process, fd).map_or(-1, |file| file.tell() as isize)
}

pub fn sys_close(process: &Process, fd: usize) -> isize {
    // 文件在句柄的最后一个引用消失时关闭
    let file = process.inner().lock().fd_table.remove(fd);
    drop(file);
    0
}
