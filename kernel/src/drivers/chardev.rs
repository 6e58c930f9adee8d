//! 字符设备

use std::collections::VecDeque;

use spin::Mutex;

pub trait CharDevice: Send + Sync {
    /// 读一个字符，暂无输入时返回空
    fn read(&self) -> Option<u8>;
    fn write(&self, ch: u8);
}

/// 内存中的串口：输入由外部注入，输出全部留存
#[derive(Debug, Default)]
pub struct VirtualSerial {
    input: Mutex<VecDeque<u8>>,
    output: Mutex<Vec<u8>>,
}

impl VirtualSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟键盘输入
    pub fn push_input(&self, bytes: &[u8]) {
        self.input.lock().extend(bytes);
    }

    /// 迄今为止的全部输出
    pub fn output(&self) -> Vec<u8> {
        self.output.lock().clone()
    }
}

impl CharDevice for VirtualSerial {
    fn read(&self) -> Option<u8> {
        self.input.lock().pop_front()
    }

    fn write(&self, ch: u8) {
        self.output.lock().push(ch);
    }
}
