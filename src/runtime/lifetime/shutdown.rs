use std::time::Duration;

use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::analytics::ClickRecorder;

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// 单个任务超时时间（秒）
const TASK_TIMEOUT_SECS: u64 = 10;

pub async fn listen_for_shutdown(recorder: &ClickRecorder) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, flushing data...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    match timeout(
        Duration::from_secs(SHUTDOWN_TIMEOUT_SECS),
        perform_shutdown_tasks(recorder),
    )
    .await
    {
        Ok(()) => info!("All shutdown tasks completed successfully"),
        Err(_) => {
            error!(
                "Shutdown tasks timed out after {} seconds! Forcing exit.",
                SHUTDOWN_TIMEOUT_SECS
            );
            std::process::exit(1);
        }
    }
}

/// 执行所有关闭任务（在超时内调用）
async fn perform_shutdown_tasks(recorder: &ClickRecorder) {
    let pending = recorder.buffered_events();
    match timeout(Duration::from_secs(TASK_TIMEOUT_SECS), recorder.flush()).await {
        Ok(()) => {
            let left = recorder.buffered_events();
            if left > 0 {
                error!("{} click events could not be persisted on shutdown", left);
            } else {
                info!("ClickRecorder flushed {} pending events", pending);
            }
        }
        Err(_) => {
            error!(
                "ClickRecorder flush timed out after {} seconds",
                TASK_TIMEOUT_SECS
            );
        }
    }
}
