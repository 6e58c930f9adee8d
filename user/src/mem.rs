//! 用户数据段中的临时内存
//!
//! 每个进程独占一条线程，分配指针记在线程局部变量里；
//! 用满之后从头复用，分配出的内存只在一次系统调用期间有效。

use std::cell::Cell;

use kernel::config::{USER_DATA_BASE, USER_DATA_SIZE};
use kernel::task::processor;

use crate::syscall::fault;

thread_local! {
    static SCRATCH_TOP: Cell<usize> = const { Cell::new(0) };
}

/// 分配 `len` 字节，4 字节对齐
pub fn scratch(len: usize) -> u32 {
    assert!(len <= USER_DATA_SIZE, "scratch request of {len} bytes is too large");
    let len = len.next_multiple_of(4);
    let offset = SCRATCH_TOP.get();
    let offset = if offset + len > USER_DATA_SIZE { 0 } else { offset };
    SCRATCH_TOP.set(offset + len);
    (USER_DATA_BASE + offset) as u32
}

/// 把数据放进用户内存，返回其地址
pub fn push_bytes(bytes: &[u8]) -> u32 {
    let va = scratch(bytes.len());
    store(va, bytes);
    va
}

/// 放入以 `\0` 结尾的字符串
pub fn push_str(s: &str) -> u32 {
    let va = scratch(s.len() + 1);
    store(va, s.as_bytes());
    store(va + s.len() as u32, &[0]);
    va
}

/// 读用户内存，非法地址会让进程被终止
pub fn load(va: u32, buf: &mut [u8]) {
    let process = processor::current_process();
    let loaded = process.inner().lock().address_space.read(va as usize, buf);
    if loaded.is_err() {
        fault(va as usize);
    }
}

/// 写用户内存，非法地址会让进程被终止
pub fn store(va: u32, data: &[u8]) {
    let process = processor::current_process();
    let stored = process.inner().lock().address_space.write(va as usize, data);
    if stored.is_err() {
        fault(va as usize);
    }
}
