//! 终端日志后端
//!
//! 日志级别由环境变量 `PCD_LOG` 指定（`error`/`warn`/`info`/`debug`/`trace`/`off`），
//! 未设置或无法解析时使用 `info`。

use std::str::FromStr;

use log::{Level, LevelFilter, Log, Metadata, Record, set_logger, set_max_level};

/// 控制日志级别的环境变量
pub const LOG_ENV: &str = "PCD_LOG";

struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!(
            "\u{1B}[{}m[{}] {}\u{1B}[0m",
            level_color(record.level()),
            record.level(),
            record.args(),
        );
    }

    fn flush(&self) {}
}

/// ANSI 前景色
fn level_color(level: Level) -> u8 {
    match level {
        Level::Error => 31, // Red
        Level::Warn => 93,  // BrightYellow
        Level::Info => 37,  // White
        Level::Debug => 32, // Green
        Level::Trace => 90, // BrightBlack
    }
}

/// 解析级别字符串，失败时回退到 `info`
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|value| LevelFilter::from_str(value.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

/// 安装 logger；重复安装时保留已有 logger
pub fn init() {
    static LOGGER: Logger = Logger;
    let level = parse_level(std::env::var(LOG_ENV).ok().as_deref());
    if let Err(err) = set_logger(&LOGGER) {
        eprintln!("[pcd] logger already installed: {}", err);
        return;
    }
    set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level(None), LevelFilter::Info);
        assert_eq!(parse_level(Some("debug")), LevelFilter::Debug);
        assert_eq!(parse_level(Some(" WARN ")), LevelFilter::Warn);
        assert_eq!(parse_level(Some("off")), LevelFilter::Off);
        assert_eq!(parse_level(Some("loud")), LevelFilter::Info);
    }

    #[test]
    fn test_levels_have_distinct_colors() {
        let colors = [
            Level::Error,
            Level::Warn,
            Level::Info,
            Level::Debug,
            Level::Trace,
        ]
        .map(level_color);
        for (i, a) in colors.iter().enumerate() {
            assert!(colors[i + 1..].iter().all(|b| b != a));
        }
    }
}
