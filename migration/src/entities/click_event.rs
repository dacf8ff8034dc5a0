//! Click event entity (append-only click log)

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "click_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub link_id: String,
    pub clicked_at: DateTimeUtc,
    /// mobile / desktop / tablet / other
    pub device: String,
    /// chrome / firefox / safari / edge / other
    pub browser: String,
    /// 加盐 xxHash64，不保存原始 IP
    pub ip_hash: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
