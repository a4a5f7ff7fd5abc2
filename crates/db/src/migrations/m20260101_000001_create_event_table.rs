//! Create event catalog table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Event::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Event::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Event::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Event::Price).integer().not_null())
                    .col(ColumnDef::new(Event::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Event::Capacity).integer())
                    .col(
                        ColumnDef::new(Event::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: is_active (catalog listing filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_event_is_active")
                    .table(Event::Table)
                    .col(Event::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Event {
    Table,
    Id,
    Name,
    Category,
    Price,
    IsActive,
    Capacity,
    CreatedAt,
}
