//! CPU状态管理：当前线程上运行的进程

use std::cell::RefCell;
use std::sync::Arc;

use super::Process;

thread_local! {
    static CURRENT: RefCell<Option<Arc<Process>>> = const { RefCell::new(None) };
}

/// 当前进程，只能在进程自己的线程上调用
pub fn current_process() -> Arc<Process> {
    try_current_process().expect("no process is running on this thread")
}

pub fn try_current_process() -> Option<Arc<Process>> {
    CURRENT.with_borrow(Option::clone)
}

pub(super) fn set_current(process: Option<Arc<Process>>) {
    CURRENT.set(process);
}
