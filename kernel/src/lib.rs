//! # 内核
//!
//! 在宿主机上模拟的单机内核：用户程序各自运行在一条线程上，
//! 经由 [`trap::trap_handler`] 陷入内核发起系统调用。
//!
//! ## 模块（自上而下）
//!
//! 1. [`syscall`]、[`trap`]：系统调用的解码与分发
//! 2. [`task`]：进程的创建、等待与退出
//! 3. [`fs`]、[`memory`]：文件描述符表与用户地址空间
//! 4. [`drivers`]：控制台等字符设备

pub mod config;
pub mod drivers;
mod error;
pub mod fs;
pub mod logging;
pub mod memory;
pub mod syscall;
pub mod task;
pub mod trap;

pub use error::KernelError;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use index_fs::IndexFileSystem;

use crate::drivers::{CharDevice, Console};
use crate::task::{Loader, Process};

/// 整台机器的共享状态
pub struct Kernel {
    fs: Arc<IndexFileSystem>,
    console: Arc<Console>,
    loader: Arc<dyn Loader>,
    next_pid: AtomicUsize,
    halted: AtomicBool,
}

impl Kernel {
    pub fn boot(
        fs: Arc<IndexFileSystem>,
        device: Arc<dyn CharDevice>,
        loader: Arc<dyn Loader>,
    ) -> Arc<Self> {
        logging::init();
        log::info!("kernel booted, {} sectors free", fs.free_sectors());

        Arc::new(Self {
            fs,
            console: Arc::new(Console::new(device)),
            loader,
            next_pid: AtomicUsize::new(1),
            halted: AtomicBool::new(false),
        })
    }

    /// 运行初始进程直至其退出，返回退出码。
    /// 程序无法加载或机器已关机时返回空。
    pub fn run(self: &Arc<Self>, cmd_line: &str) -> Option<i32> {
        if self.is_halted() {
            return None;
        }
        let status = Process::spawn(self, cmd_line)?;
        let exit_code = status.wait_exit();
        (!self.is_halted()).then_some(exit_code)
    }

    #[inline]
    pub fn fs(&self) -> &Arc<IndexFileSystem> {
        &self.fs
    }

    #[inline]
    pub fn console(&self) -> &Arc<Console> {
        &self.console
    }

    #[inline]
    pub fn loader(&self) -> &Arc<dyn Loader> {
        &self.loader
    }

    /// 关机
    pub fn halt(&self) {
        if !self.halted.swap(true, Ordering::SeqCst) {
            log::info!("machine halted");
        }
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    pub(crate) fn alloc_pid(&self) -> usize {
        self.next_pid.fetch_add(1, Ordering::Relaxed)
    }
}
