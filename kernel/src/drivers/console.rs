use std::sync::Arc;
use std::thread;

use spin::Mutex;

use super::CharDevice;

/// 控制台：键盘输入与串行化的输出
pub struct Console {
    device: Arc<dyn CharDevice>,
    /// 一次 `putbuf` 的输出不会与其它输出交错
    output_lock: Mutex<()>,
}

impl Console {
    pub fn new(device: Arc<dyn CharDevice>) -> Self {
        Self {
            device,
            output_lock: Mutex::new(()),
        }
    }

    /// 整块输出
    pub fn putbuf(&self, buf: &[u8]) {
        let _guard = self.output_lock.lock();
        for &ch in buf {
            self.device.write(ch);
        }
    }

    /// 读一个字符，没有输入时让出处理器
    pub fn getc(&self) -> u8 {
        loop {
            match self.device.read() {
                Some(ch) => return ch,
                None => thread::yield_now(),
            }
        }
    }
}
