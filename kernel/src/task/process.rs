use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use index_fs::Inode;
use spin::Mutex;

use super::{Entry, ProcessStatus, Terminated, processor};
use crate::Kernel;
use crate::config::KILLED_EXIT_CODE;
use crate::fs::FileTable;
use crate::memory::AddressSpace;

/// 进程控制块
pub struct Process {
    pid: usize,
    name: String,
    kernel: Arc<Kernel>,
    /// 与父进程共享的状态槽
    status: Arc<ProcessStatus>,
    inner: Mutex<ProcessInner>,
}

pub struct ProcessInner {
    pub address_space: AddressSpace,
    pub fd_table: FileTable,
    /// 尚未被等待过的子进程
    children: Vec<Arc<ProcessStatus>>,
    /// 运行期间被禁写的程序文件
    executable: Option<Inode>,
    exited: bool,
}

impl Process {
    /// 在新线程上启动 `cmd_line` 指定的程序，等到加载结果揭晓。
    /// 加载失败时返回空。
    pub fn spawn(kernel: &Arc<Kernel>, cmd_line: &str) -> Option<Arc<ProcessStatus>> {
        let args: Vec<String> = cmd_line.split_whitespace().map(String::from).collect();
        let name = args.first()?.clone();

        let pid = kernel.alloc_pid();
        let status = Arc::new(ProcessStatus::new(pid));
        let process = Arc::new(Self {
            pid,
            name: name.clone(),
            kernel: kernel.clone(),
            status: status.clone(),
            inner: Mutex::new(ProcessInner {
                address_space: AddressSpace::new_user(),
                fd_table: FileTable::new(),
                children: Vec::new(),
                executable: None,
                exited: false,
            }),
        });

        let spawned = thread::Builder::new()
            .name(format!("{name}#{pid}"))
            .spawn(move || process.run(args));
        if let Err(err) = spawned {
            log::error!("failed to start {name}: {err}");
            return None;
        }

        status.wait_loaded().then_some(status)
    }

    #[inline]
    pub fn pid(&self) -> usize {
        self.pid
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kernel(&self) -> &Arc<Kernel> {
        &self.kernel
    }

    #[inline]
    pub fn inner(&self) -> &Mutex<ProcessInner> {
        &self.inner
    }

    /// 进程线程的主体
    fn run(self: Arc<Self>, args: Vec<String>) {
        processor::set_current(Some(self.clone()));

        let entry = self.load();
        self.status.set_loaded(entry.is_some());

        let exit_code = match entry {
            None => KILLED_EXIT_CODE,
            Some(entry) => match panic::catch_unwind(AssertUnwindSafe(|| entry(&args))) {
                Ok(exit_code) => exit_code,
                Err(payload) if payload.is::<Terminated>() => KILLED_EXIT_CODE,
                Err(_) => {
                    log::warn!("{} crashed", self.name);
                    KILLED_EXIT_CODE
                }
            },
        };
        // 已被终止的进程不会再退出一次
        self.exit(exit_code);

        processor::set_current(None);
    }

    /// 读出程序映像交给加载器，成功后禁止改写程序文件
    fn load(&self) -> Option<Entry> {
        let inode = match self.kernel.fs().open(&self.name) {
            Ok(inode) => inode,
            Err(err) => {
                log::warn!("load {}: {err}", self.name);
                return None;
            }
        };

        let mut image = vec![0; inode.length() as usize];
        let size = inode.read_at(&mut image, 0);
        image.truncate(size);

        let entry = self.kernel.loader().load(&self.name, &image)?;
        inode.deny_write();
        self.inner.lock().executable = Some(inode);
        Some(entry)
    }

    /// 启动子进程，返回其 pid；加载失败返回空
    pub fn exec(&self, cmd_line: &str) -> Option<usize> {
        let child = Self::spawn(&self.kernel, cmd_line)?;
        let pid = child.pid();
        self.inner.lock().children.push(child);
        Some(pid)
    }

    /// 等待子进程退出并取得退出码。
    /// 每个子进程只能等待一次，不是子进程时返回 -1。
    pub fn wait(&self, pid: usize) -> i32 {
        let child = {
            let mut inner = self.inner.lock();
            let Some(index) = inner.children.iter().position(|child| child.pid() == pid) else {
                return -1;
            };
            inner.children.swap_remove(index)
        };
        child.wait_exit()
    }

    /// 释放进程的全部资源并公布退出码，重复调用无效
    pub fn exit(&self, exit_code: i32) {
        let executable = {
            let mut inner = self.inner.lock();
            if inner.exited {
                return;
            }
            inner.exited = true;
            inner.fd_table.clear();
            inner.children.clear();
            inner.address_space.clear();
            inner.executable.take()
        };
        if let Some(executable) = executable {
            executable.allow_write();
        }

        log::info!("{}: exit({exit_code})", self.name);
        self.status.set_exited(exit_code);
    }
}
