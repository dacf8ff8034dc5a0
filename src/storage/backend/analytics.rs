//! 点击日志统计查询
//!
//! 所有统计都直接从 click_events 计算，不维护冗余计数。

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    AccessMode, ColumnTrait, DbBackend, DbErr, EntityTrait, FromQueryResult, IsolationLevel,
    QueryFilter, QueryOrder, QuerySelect, Select, SelectModel, Selector, TransactionTrait,
};

use super::{SeaOrmStorage, retry};
use crate::errors::Result;
use crate::storage::TimeRange;
use migration::entities::click_event;

/// 按天分组的结果行，label 为 UTC 日期 YYYY-MM-DD
#[derive(Debug, FromQueryResult)]
pub struct DailyRow {
    pub label: String,
    pub count: i64,
}

/// 按分类分组的结果行
#[derive(Debug, FromQueryResult)]
pub struct CategoryRow {
    pub label: String,
    pub count: i64,
}

/// 同一快照下的三组分组计数
#[derive(Debug)]
pub struct ClickBreakdown {
    pub daily: Vec<DailyRow>,
    pub devices: Vec<CategoryRow>,
    pub browsers: Vec<CategoryRow>,
}

fn scoped(link_id: &str, range: &TimeRange) -> Select<click_event::Entity> {
    let mut query = click_event::Entity::find().filter(click_event::Column::LinkId.eq(link_id));
    if let Some(start) = range.start {
        query = query.filter(click_event::Column::ClickedAt.gte(start));
    }
    if let Some(end) = range.end {
        query = query.filter(click_event::Column::ClickedAt.lte(end));
    }
    query
}

fn daily_query(link_id: &str, range: &TimeRange, date_expr: Expr) -> Selector<SelectModel<DailyRow>> {
    scoped(link_id, range)
        .select_only()
        .column_as(date_expr.clone(), "label")
        .column_as(click_event::Column::Id.count(), "count")
        .group_by(date_expr)
        .order_by_asc(Expr::cust("label"))
        .into_model::<DailyRow>()
}

fn category_query(
    link_id: &str,
    range: &TimeRange,
    column: click_event::Column,
) -> Selector<SelectModel<CategoryRow>> {
    scoped(link_id, range)
        .select_only()
        .column_as(column, "label")
        .column_as(click_event::Column::Id.count(), "count")
        .group_by(column)
        .order_by_desc(Expr::cust("count"))
        .into_model::<CategoryRow>()
}

impl SeaOrmStorage {
    /// clicked_at 截断到 UTC 日期的 SQL 表达式
    pub fn day_bucket_expr(&self) -> Expr {
        match self.db.get_database_backend() {
            DbBackend::Sqlite => Expr::cust("strftime('%Y-%m-%d', clicked_at)"),
            DbBackend::MySql => Expr::cust("DATE_FORMAT(clicked_at, '%Y-%m-%d')"),
            DbBackend::Postgres | _ => {
                Expr::cust("TO_CHAR(clicked_at AT TIME ZONE 'UTC', 'YYYY-MM-DD')")
            }
        }
    }

    /// 按天、设备、浏览器分组计数，三次查询在同一个只读事务内完成
    pub async fn click_breakdown(&self, link_id: &str, range: &TimeRange) -> Result<ClickBreakdown> {
        let db = &self.db;
        let backend = db.get_database_backend();
        let date_expr = self.day_bucket_expr();

        let breakdown = retry::with_retry("click_breakdown", self.retry_config, || {
            let date_expr = date_expr.clone();
            async move {
                // SQLite 事务本身即快照读，不支持设置隔离级别
                let txn = match backend {
                    DbBackend::Sqlite => db.begin().await?,
                    _ => {
                        db.begin_with_config(
                            Some(IsolationLevel::RepeatableRead),
                            Some(AccessMode::ReadOnly),
                        )
                        .await?
                    }
                };

                let daily = daily_query(link_id, range, date_expr).all(&txn).await?;
                let devices = category_query(link_id, range, click_event::Column::Device)
                    .all(&txn)
                    .await?;
                let browsers = category_query(link_id, range, click_event::Column::Browser)
                    .all(&txn)
                    .await?;
                txn.commit().await?;

                Ok::<_, DbErr>(ClickBreakdown {
                    daily,
                    devices,
                    browsers,
                })
            }
        })
        .await?;

        Ok(breakdown)
    }

    /// 删除 cutoff 之前的一批点击事件，返回删除行数
    pub async fn delete_click_events_before(
        &self,
        cutoff: DateTime<Utc>,
        batch_size: u64,
    ) -> Result<u64> {
        let db = &self.db;

        let ids: Vec<i64> = click_event::Entity::find()
            .select_only()
            .column(click_event::Column::Id)
            .filter(click_event::Column::ClickedAt.lt(cutoff))
            .order_by_asc(click_event::Column::Id)
            .limit(batch_size)
            .into_tuple()
            .all(db)
            .await?;

        if ids.is_empty() {
            return Ok(0);
        }

        let deleted = click_event::Entity::delete_many()
            .filter(click_event::Column::Id.is_in(ids))
            .exec(db)
            .await?
            .rows_affected;

        Ok(deleted)
    }
}
