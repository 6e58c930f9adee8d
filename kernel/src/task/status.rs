use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// 子进程留给父进程的状态槽
pub struct ProcessStatus {
    pid: usize,
    slot: Mutex<Slot>,
    changed: Condvar,
}

#[derive(Default)]
struct Slot {
    /// 加载是否成功，未知时为空
    loaded: Option<bool>,
    exit_code: Option<i32>,
}

impl ProcessStatus {
    pub fn new(pid: usize) -> Self {
        Self {
            pid,
            slot: Mutex::new(Slot::default()),
            changed: Condvar::new(),
        }
    }

    #[inline]
    pub fn pid(&self) -> usize {
        self.pid
    }

    pub fn set_loaded(&self, loaded: bool) {
        self.slot().loaded = Some(loaded);
        self.changed.notify_all();
    }

    /// 阻塞到加载结果揭晓
    pub fn wait_loaded(&self) -> bool {
        let mut slot = self.slot();
        loop {
            if let Some(loaded) = slot.loaded {
                return loaded;
            }
            slot = self
                .changed
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn set_exited(&self, exit_code: i32) {
        self.slot().exit_code = Some(exit_code);
        self.changed.notify_all();
    }

    /// 阻塞到进程退出
    pub fn wait_exit(&self) -> i32 {
        let mut slot = self.slot();
        loop {
            if let Some(exit_code) = slot.exit_code {
                return exit_code;
            }
            slot = self
                .changed
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.slot().exit_code
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn waiters_wake_up_in_order() {
        let status = Arc::new(ProcessStatus::new(7));
        let child = status.clone();
        let handle = thread::spawn(move || {
            child.set_loaded(true);
            child.set_exited(42);
        });

        assert!(status.wait_loaded());
        assert_eq!(status.wait_exit(), 42);
        assert_eq!(status.exit_code(), Some(42));
        handle.join().unwrap();
    }
}
