//! 标准输入输出，均由控制台承担

use std::sync::Arc;

use super::File;
use crate::drivers::Console;

/// 键盘
pub struct Stdin(Arc<Console>);

/// 控制台输出
pub struct Stdout(Arc<Console>);

impl Stdin {
    pub fn new(console: Arc<Console>) -> Self {
        Self(console)
    }
}

impl Stdout {
    pub fn new(console: Arc<Console>) -> Self {
        Self(console)
    }
}

impl File for Stdin {
    fn writable(&self) -> bool {
        false
    }

    /// 逐个读入字符直至填满缓冲区
    fn read(&self, buf: &mut [u8]) -> usize {
        for ch in buf.iter_mut() {
            *ch = self.0.getc();
        }
        buf.len()
    }

    fn write(&self, _buf: &[u8]) -> usize {
        panic!("Cannot write to stdin!");
    }
}

impl File for Stdout {
    fn readable(&self) -> bool {
        false
    }

    fn read(&self, _buf: &mut [u8]) -> usize {
        panic!("Cannot read from stdout!");
    }

    /// 一次调用的输出不会和其它进程的输出交错
    fn write(&self, buf: &[u8]) -> usize {
        self.0.putbuf(buf);
        buf.len()
    }
}
