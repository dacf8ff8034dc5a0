//! 点击事件表迁移
//!
//! click_events 只追加，按 (link_id, clicked_at) 聚合查询。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClickEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClickEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClickEvents::LinkId).string_len(36).not_null())
                    .col(
                        ColumnDef::new(ClickEvents::ClickedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClickEvents::Device).string_len(16).not_null())
                    .col(ColumnDef::new(ClickEvents::Browser).string_len(16).not_null())
                    .col(ColumnDef::new(ClickEvents::IpHash).string_len(16).null())
                    .to_owned(),
            )
            .await?;

        // 复合索引（单链接时间序列 + 分类聚合）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_events_link_time")
                    .table(ClickEvents::Table)
                    .col(ClickEvents::LinkId)
                    .col(ClickEvents::ClickedAt)
                    .to_owned(),
            )
            .await?;

        // 数据清理按时间删除
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_events_clicked_at")
                    .table(ClickEvents::Table)
                    .col(ClickEvents::ClickedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_click_events_clicked_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_click_events_link_time").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ClickEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ClickEvents {
    #[sea_orm(iden = "click_events")]
    Table,
    Id,
    LinkId,
    ClickedAt,
    Device,
    Browser,
    IpHash,
}
