use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::analytics::{ClickRecorder, ClickSink, DataRetentionTask};
use crate::api::AppServices;
use crate::storage::StorageFactory;

pub struct StartupContext {
    pub services: AppServices,
}

/// 准备服务器启动的上下文
/// 包括存储、点击记录器、保留期任务与各业务服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.get_backend_name());

    // 点击记录器：定时刷盘 + 阈值触发
    let sink: Arc<dyn ClickSink> = storage.clone();
    let recorder = Arc::new(ClickRecorder::from_config(sink));
    let recorder_for_task = recorder.clone();
    tokio::spawn(async move {
        recorder_for_task.start_background_task().await;
    });
    debug!("ClickRecorder background flush task started");

    let config = crate::config::get_config();
    let retention = Arc::new(DataRetentionTask::new(
        storage.clone(),
        config.analytics.retention_days,
    ));
    retention.spawn_background_task(config.analytics.retention_interval_hours);

    let services = AppServices::from_config(storage, recorder);

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(StartupContext { services })
}
