//! ClickSink implementation for SeaOrmStorage

use async_trait::async_trait;
use sea_orm::{EntityTrait, TransactionTrait};
use tracing::debug;

use super::converters::click_event_to_active_model;
use super::{SeaOrmStorage, retry};
use crate::analytics::ClickSink;
use crate::storage::ClickEvent;
use migration::entities::click_event;

/// 单条 INSERT 的最大行数（SQLite 绑定参数上限 32766 / 每行 5 列）
const INSERT_CHUNK_SIZE: usize = 1000;

#[async_trait]
impl ClickSink for SeaOrmStorage {
    async fn write_events(&self, events: Vec<ClickEvent>) -> anyhow::Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        let total = events.len();
        let db = &self.db;

        let chunks: Vec<Vec<click_event::ActiveModel>> = events
            .chunks(INSERT_CHUNK_SIZE)
            .map(|chunk| chunk.iter().map(click_event_to_active_model).collect())
            .collect();

        // 整批在同一事务内提交，失败时不留下部分写入
        retry::with_retry("write_click_events", self.retry_config, || {
            let chunks = chunks.clone();
            async move {
                let txn = db.begin().await?;
                for models in chunks {
                    click_event::Entity::insert_many(models).exec(&txn).await?;
                }
                txn.commit().await
            }
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to insert click events after retries: {}", e))?;

        debug!(
            "{} click events written to {} database",
            total,
            self.backend_name.to_uppercase()
        );
        Ok(())
    }
}
