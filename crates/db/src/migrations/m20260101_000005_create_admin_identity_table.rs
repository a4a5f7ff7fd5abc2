//! Create `admin_identity` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminIdentity::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AdminIdentity::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(AdminIdentity::Email).string_len(256).not_null())
                    .col(ColumnDef::new(AdminIdentity::AddedBy).string_len(256))
                    .col(
                        ColumnDef::new(AdminIdentity::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: email
        manager
            .create_index(
                Index::create()
                    .name("idx_admin_identity_email")
                    .table(AdminIdentity::Table)
                    .col(AdminIdentity::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminIdentity::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AdminIdentity {
    Table,
    Id,
    Email,
    AddedBy,
    CreatedAt,
}
