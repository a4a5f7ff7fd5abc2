//! Create registration and `registration_event` tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create registration table
        manager
            .create_table(
                Table::create()
                    .table(Registration::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Registration::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Registration::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Registration::Email).string_len(256).not_null())
                    .col(ColumnDef::new(Registration::Phone).string_len(20).not_null())
                    .col(ColumnDef::new(Registration::College).string_len(256).not_null())
                    .col(ColumnDef::new(Registration::Year).string_len(16))
                    .col(ColumnDef::new(Registration::Branch).string_len(64))
                    .col(ColumnDef::new(Registration::Tier).string_len(8))
                    .col(ColumnDef::new(Registration::PassType).string_len(16))
                    .col(ColumnDef::new(Registration::PassTier).string_len(8))
                    .col(ColumnDef::new(Registration::TotalAmount).integer().not_null())
                    .col(ColumnDef::new(Registration::TransactionId).string_len(50).not_null())
                    .col(ColumnDef::new(Registration::ScreenshotKey).string_len(512).not_null())
                    .col(
                        ColumnDef::new(Registration::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Registration::ReviewedBy).string_len(256))
                    .col(ColumnDef::new(Registration::ReviewedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Registration::RejectionReason).text())
                    .col(
                        ColumnDef::new(Registration::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Registration::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: status (admin dashboard filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_registration_status")
                    .table(Registration::Table)
                    .col(Registration::Status)
                    .to_owned(),
            )
            .await?;

        // Index: transaction_id (duplicate payment-reference check)
        manager
            .create_index(
                Index::create()
                    .name("idx_registration_transaction_id")
                    .table(Registration::Table)
                    .col(Registration::TransactionId)
                    .to_owned(),
            )
            .await?;

        // Partial unique indexes: at most one non-rejected registration per
        // email and per phone. This is the store-level backstop behind the
        // best-effort duplicate pre-check.
        manager
            .get_connection()
            .execute_unprepared(
                r"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_registration_email_active
                ON registration (email)
                WHERE status != 'rejected';
                ",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_registration_phone_active
                ON registration (phone)
                WHERE status != 'rejected';
                ",
            )
            .await?;

        // Create registration_event table (line items)
        manager
            .create_table(
                Table::create()
                    .table(RegistrationEvent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RegistrationEvent::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RegistrationEvent::RegistrationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(RegistrationEvent::EventId).string_len(32).not_null())
                    .col(ColumnDef::new(RegistrationEvent::EventName).string_len(256).not_null())
                    .col(ColumnDef::new(RegistrationEvent::Price).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registration_event_registration")
                            .from(RegistrationEvent::Table, RegistrationEvent::RegistrationId)
                            .to(Registration::Table, Registration::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: registration_id
        manager
            .create_index(
                Index::create()
                    .name("idx_registration_event_registration_id")
                    .table(RegistrationEvent::Table)
                    .col(RegistrationEvent::RegistrationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RegistrationEvent::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Registration::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Registration {
    Table,
    Id,
    Name,
    Email,
    Phone,
    College,
    Year,
    Branch,
    Tier,
    PassType,
    PassTier,
    TotalAmount,
    TransactionId,
    ScreenshotKey,
    Status,
    ReviewedBy,
    ReviewedAt,
    RejectionReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum RegistrationEvent {
    Table,
    Id,
    RegistrationId,
    EventId,
    EventName,
    Price,
}
