//! 点击事件保留期清理

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::storage::SeaOrmStorage;

const DELETE_BATCH_SIZE: u64 = 10_000;
const MAX_BATCHES_PER_RUN: u32 = 1000;

pub struct DataRetentionTask {
    storage: Arc<SeaOrmStorage>,
    retention_days: u64,
}

impl DataRetentionTask {
    pub fn new(storage: Arc<SeaOrmStorage>, retention_days: u64) -> Self {
        Self {
            storage,
            retention_days,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.retention_days > 0
    }

    /// 分批删除早于保留期的点击事件，返回删除总数
    pub async fn run_cleanup(&self) -> Result<u64> {
        if !self.is_enabled() {
            return Ok(0);
        }

        let cutoff = Utc::now() - Duration::days(self.retention_days as i64);
        let mut total_deleted = 0u64;

        for batch in 1..=MAX_BATCHES_PER_RUN {
            let deleted = self
                .storage
                .delete_click_events_before(cutoff, DELETE_BATCH_SIZE)
                .await?;
            total_deleted += deleted;
            debug!(
                "Retention batch {}: deleted {} click events (total {})",
                batch, deleted, total_deleted
            );

            if deleted < DELETE_BATCH_SIZE {
                break;
            }
            if batch == MAX_BATCHES_PER_RUN {
                warn!(
                    "Retention cleanup stopped after {} batches ({} rows deleted)",
                    MAX_BATCHES_PER_RUN, total_deleted
                );
            }
            tokio::time::sleep(StdDuration::from_millis(100)).await;
        }

        if total_deleted > 0 {
            info!(
                "Retention cleanup removed {} click events older than {} days",
                total_deleted, self.retention_days
            );
        }
        Ok(total_deleted)
    }

    pub fn spawn_background_task(self: Arc<Self>, interval_hours: u64) {
        if !self.is_enabled() {
            info!("Click event retention disabled (retention_days = 0)");
            return;
        }

        let retention_days = self.retention_days;
        let interval = StdDuration::from_secs(interval_hours.max(1) * 60 * 60);
        tokio::spawn(async move {
            // 启动后稍等片刻再执行第一次
            tokio::time::sleep(StdDuration::from_secs(60)).await;
            loop {
                if let Err(e) = self.run_cleanup().await {
                    error!("Retention cleanup failed: {}", e);
                }
                tokio::time::sleep(interval).await;
            }
        });

        info!(
            "Retention task started (keep {} days, every {} hours)",
            retention_days, interval_hours
        );
    }
}
