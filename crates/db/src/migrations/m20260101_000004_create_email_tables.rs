//! Create `email_template` and `email_log` tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create email_template table
        manager
            .create_table(
                Table::create()
                    .table(EmailTemplate::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EmailTemplate::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(EmailTemplate::Key).string_len(64).not_null())
                    .col(ColumnDef::new(EmailTemplate::Subject).string_len(512).not_null())
                    .col(ColumnDef::new(EmailTemplate::HtmlBody).text().not_null())
                    .col(ColumnDef::new(EmailTemplate::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: key
        manager
            .create_index(
                Index::create()
                    .name("idx_email_template_key")
                    .table(EmailTemplate::Table)
                    .col(EmailTemplate::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create email_log table
        manager
            .create_table(
                Table::create()
                    .table(EmailLog::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EmailLog::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(EmailLog::TemplateKey).string_len(64).not_null())
                    .col(ColumnDef::new(EmailLog::Recipient).string_len(256).not_null())
                    .col(ColumnDef::new(EmailLog::Status).string_len(8).not_null())
                    .col(ColumnDef::new(EmailLog::Error).text())
                    .col(
                        ColumnDef::new(EmailLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: created_at (recent-first listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_email_log_created_at")
                    .table(EmailLog::Table)
                    .col(EmailLog::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmailLog::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EmailTemplate::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EmailTemplate {
    Table,
    Id,
    Key,
    Subject,
    HtmlBody,
    UpdatedAt,
}

#[derive(Iden)]
enum EmailLog {
    Table,
    Id,
    TemplateKey,
    Recipient,
    Status,
    Error,
    CreatedAt,
}
