//! Logging system initialization
//!
//! Sets up the global `tracing` subscriber from [`LoggingConfig`]:
//! level filter, text or JSON output, console or (rotating) file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::LoggingConfig;

/// Initialize logging system based on configuration
///
/// **Note**: This should be called only once during application startup,
/// after the configuration has been loaded.
///
/// # Returns
/// * `WorkerGuard` - Must be kept alive for the duration of the program
///   to ensure non-blocking log writes are flushed
pub fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    let to_console = config.file.as_ref().is_none_or(|f| f.is_empty());
    let writer = build_writer(config);

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(to_console);

    // 重复初始化（例如测试里）不应 panic
    let result = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("[WARN] Logging already initialized: {}", e);
    }

    guard
}

/// 根据配置创建日志输出目标，文件打开失败时回退到 stdout
fn build_writer(config: &LoggingConfig) -> Box<dyn std::io::Write + Send + Sync> {
    let Some(log_file) = config.file.as_deref().filter(|f| !f.is_empty()) else {
        return Box::new(std::io::stdout());
    };

    if config.enable_rotation {
        let path = Path::new(log_file);
        let dir = path.parent().unwrap_or(Path::new("."));
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("linklytics.log");

        match rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups as usize)
            .build(dir)
        {
            Ok(appender) => Box::new(appender),
            Err(e) => {
                eprintln!(
                    "[ERROR] Failed to create rolling log appender: {}, using stdout",
                    e
                );
                Box::new(std::io::stdout())
            }
        }
    } else {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
        {
            Ok(file) => Box::new(file),
            Err(e) => {
                eprintln!("[ERROR] Failed to open log file {}: {}, using stdout", log_file, e);
                Box::new(std::io::stdout())
            }
        }
    }
}
