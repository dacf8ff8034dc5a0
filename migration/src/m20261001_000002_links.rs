use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 links 表
        manager
            .create_table(
                Table::create()
                    .table(Links::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Links::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Links::ShortCode).string_len(64).not_null())
                    .col(ColumnDef::new(Links::OriginalUrl).text().not_null())
                    .col(ColumnDef::new(Links::OwnerId).string_len(36).not_null())
                    .col(
                        ColumnDef::new(Links::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Links::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 短码全局唯一：创建与别名冲突检测都依赖这个索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_short_code")
                    .table(Links::Table)
                    .col(Links::ShortCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 按 owner 列表查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_owner_created")
                    .table(Links::Table)
                    .col(Links::OwnerId)
                    .col(Links::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_links_owner_created").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_links_short_code").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Links::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Links {
    #[sea_orm(iden = "links")]
    Table,
    Id,
    ShortCode,
    OriginalUrl,
    OwnerId,
    CreatedAt,
    ExpiresAt,
}
