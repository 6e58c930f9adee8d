use std::fmt;
use std::fmt::Write;

use crate::fs::{read, write};

const STDIN: usize = 0;
const STDOUT: usize = 1;

struct Stdout;

impl Write for Stdout {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        write(STDOUT, s.as_bytes()).ok_or(fmt::Error)?;
        Ok(())
    }
}

/// 整段格式化后一次写出，避免与其它进程的输出交错
pub fn print(args: fmt::Arguments) {
    let _ = Stdout.write_str(&fmt::format(args));
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::console::print(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! println {
    () => {
        $crate::print!("\n")
    };
    ($($arg:tt)*) => {
        $crate::console::print(format_args!("{}\n", format_args!($($arg)*)))
    };
}

pub fn getchar() -> u8 {
    let mut c = [0; 1];
    read(STDIN, &mut c);
    c[0]
}
