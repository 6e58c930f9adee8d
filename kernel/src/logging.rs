use log::Log;
use log::{Level, LevelFilter};
use log::{Metadata, Record};
use spin::Once;

struct Logger;

impl Log for Logger {
    fn enabled(&self, _: &Metadata) -> bool {
        true // 允许全部级别的日志
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        use Level::*;
        let color = match record.level() {
            Error => 31,
            Warn => 93,
            Info => 34,
            Debug => 32,
            Trace => 90,
        };

        let thread = std::thread::current();
        eprintln!(
            "\u{1B}[{}m[{:<5}] [{}] {}\u{1B}[0m",
            color,
            record.level(),
            thread.name().unwrap_or("kernel"),
            record.args()
        );
    }

    fn flush(&self) {}
}

/// 安装内核日志，多次调用只生效一次；已有其它日志实现时保持原样
pub fn init() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        static LOGGER: Logger = Logger;
        if log::set_logger(&LOGGER).is_err() {
            return;
        }

        let level = option_env!("LOG")
            .and_then(|s: &'static str| s.parse().ok())
            .unwrap_or(LevelFilter::Off);
        log::set_max_level(level);
    });
}
