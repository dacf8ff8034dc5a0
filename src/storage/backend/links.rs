use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::debug;

use super::converters::{link_to_active_model, model_to_link};
use super::{SeaOrmStorage, retry};
use crate::errors::{LinklyticsError, Result};
use crate::storage::Link;
use migration::entities::{click_event, link};

#[derive(Debug, FromQueryResult)]
struct LinkClickCount {
    link_id: String,
    count: i64,
}

impl SeaOrmStorage {
    /// 插入新链接，短码冲突返回 AliasTaken
    pub async fn insert_link(&self, new_link: &Link) -> Result<()> {
        let db = &self.db;
        let model = link_to_active_model(new_link);

        retry::with_retry("insert_link", self.retry_config, || {
            let model = model.clone();
            async move { link::Entity::insert(model).exec(db).await }
        })
        .await
        .map_err(|e| {
            if retry::is_unique_violation(&e) {
                LinklyticsError::alias_taken(format!(
                    "Short code '{}' is already in use",
                    new_link.short_code
                ))
            } else {
                LinklyticsError::database_operation(format!("Failed to insert link: {}", e))
            }
        })?;

        debug!("Link inserted: {} -> {}", new_link.short_code, new_link.original_url);
        Ok(())
    }

    pub async fn find_link_by_code(&self, code: &str) -> Result<Option<Link>> {
        let db = &self.db;
        let model = retry::with_retry("find_link_by_code", self.retry_config, || async {
            link::Entity::find()
                .filter(link::Column::ShortCode.eq(code))
                .one(db)
                .await
        })
        .await?;

        Ok(model.map(model_to_link))
    }

    pub async fn find_link_by_id(&self, id: &str) -> Result<Option<Link>> {
        let db = &self.db;
        let model = retry::with_retry("find_link_by_id", self.retry_config, || async {
            link::Entity::find_by_id(id.to_string()).one(db).await
        })
        .await?;

        Ok(model.map(model_to_link))
    }

    /// 按创建时间倒序列出用户的链接
    pub async fn list_links_by_owner(&self, owner_id: &str) -> Result<Vec<Link>> {
        let db = &self.db;
        let models = retry::with_retry("list_links_by_owner", self.retry_config, || async {
            link::Entity::find()
                .filter(link::Column::OwnerId.eq(owner_id))
                .order_by_desc(link::Column::CreatedAt)
                .order_by_desc(link::Column::Id)
                .all(db)
                .await
        })
        .await?;

        Ok(models.into_iter().map(model_to_link).collect())
    }

    /// 批量统计点击数，无点击的链接不出现在结果中
    pub async fn count_clicks_by_links(&self, link_ids: &[String]) -> Result<HashMap<String, u64>> {
        if link_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let db = &self.db;
        let rows = retry::with_retry("count_clicks_by_links", self.retry_config, || async {
            click_event::Entity::find()
                .select_only()
                .column(click_event::Column::LinkId)
                .column_as(click_event::Column::Id.count(), "count")
                .filter(click_event::Column::LinkId.is_in(link_ids.iter().cloned()))
                .group_by(click_event::Column::LinkId)
                .into_model::<LinkClickCount>()
                .all(db)
                .await
        })
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.link_id, row.count.max(0) as u64))
            .collect())
    }
}
