//! 捕获日志的 `log` 后端
//!
//! `log` 只允许安装一次全局 logger，而测试是并行执行的；因此断言时应使用
//! 各测试独有的关键字（例如独有的节点名前缀）过滤记录。

use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record};

/// 一条被捕获的日志
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    /// 级别
    pub level: Level,
    /// 格式化后的消息
    pub message: String,
}

/// 把所有日志保存在内存中的 logger
pub struct CaptureLogger {
    records: Mutex<Vec<CapturedRecord>>,
}

static LOGGER: OnceLock<CaptureLogger> = OnceLock::new();

impl CaptureLogger {
    /// 安装为全局 logger（重复调用返回同一实例）
    pub fn install() -> &'static CaptureLogger {
        let mut first = false;
        let logger = LOGGER.get_or_init(|| {
            first = true;
            CaptureLogger {
                records: Mutex::new(Vec::new()),
            }
        });
        if first && log::set_logger(logger).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
        logger
    }

    /// 所有消息中包含 `needle` 的记录
    pub fn records_containing(&self, needle: &str) -> Vec<CapturedRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.message.contains(needle))
            .cloned()
            .collect()
    }
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let message = record.args().to_string();
        self.records.lock().unwrap().push(CapturedRecord {
            level: record.level(),
            message,
        });
    }

    fn flush(&self) {}
}
