//! 日志初始化
//!
//! 按 `[log]` 配置安装 flexi_logger，文件按大小滚动，异步写入。
//! 重写核心只通过 `log` 宏输出，没有安装日志器时这些记录直接丢弃。

use std::sync::{Mutex, MutexGuard};

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};

use crate::config::{Config, LogConfig};
use crate::core::{OptimizerError, OptimizerResult};

static LOGGER_HANDLE: Mutex<Option<LoggerHandle>> = Mutex::new(None);

/// 取得句柄槽位，持锁线程 panic 后锁中毒也照常使用
fn handle_slot() -> MutexGuard<'static, Option<LoggerHandle>> {
    LOGGER_HANDLE.lock().unwrap_or_else(|e| e.into_inner())
}

fn build_logger(config: &LogConfig) -> OptimizerResult<Logger> {
    let logger = Logger::try_with_str(&config.level)?
        .log_to_file(
            FileSpec::default()
                .basename(&config.file)
                .directory(&config.dir),
        )
        .rotate(
            Criterion::Size(config.max_file_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.max_files),
        )
        .write_mode(WriteMode::Async)
        .append();
    Ok(logger)
}

/// 安装全局日志器
///
/// 已经初始化过时返回 `OptimizerError::Logging`，原有日志器保持不变。
///
/// ```no_run
/// use sqlrewrite::config::Config;
/// use sqlrewrite::utils::logging;
///
/// logging::init(&Config::default())?;
/// # Ok::<(), sqlrewrite::core::OptimizerError>(())
/// ```
pub fn init(config: &Config) -> OptimizerResult<()> {
    let mut slot = handle_slot();
    if slot.is_some() {
        return Err(OptimizerError::Logging("日志系统已经初始化".to_string()));
    }

    let handle = build_logger(&config.log)?.start()?;
    *slot = Some(handle);
    drop(slot);

    log::info!(
        "日志系统初始化完成: {}/{}, 级别 {}",
        config.log.dir,
        config.log.file,
        config.log.level
    );
    Ok(())
}

/// 把异步缓冲区写入文件，不关闭日志器
pub fn flush() {
    if let Some(handle) = handle_slot().as_ref() {
        handle.flush();
    }
}

/// 写完缓冲区并释放句柄
pub fn shutdown() {
    if let Some(handle) = handle_slot().take() {
        handle.flush();
    }
}

pub fn is_initialized() -> bool {
    handle_slot().is_some()
}
