//! Create `legacy_group` and member tables migration.
//!
//! `legacy_group` mirrors the pre-unification table layout so historical rows
//! can be imported as-is; member rows reference either shape.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create legacy_group table
        manager
            .create_table(
                Table::create()
                    .table(LegacyGroup::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LegacyGroup::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(LegacyGroup::ContactEmail).string_len(256))
                    .col(ColumnDef::new(LegacyGroup::ContactPhone).string_len(20))
                    .col(ColumnDef::new(LegacyGroup::College).string_len(256))
                    .col(
                        ColumnDef::new(LegacyGroup::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(LegacyGroup::TotalAmount).integer().not_null().default(0))
                    .col(ColumnDef::new(LegacyGroup::TransactionId).string_len(50))
                    .col(
                        ColumnDef::new(LegacyGroup::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: contact_email
        manager
            .create_index(
                Index::create()
                    .name("idx_legacy_group_contact_email")
                    .table(LegacyGroup::Table)
                    .col(LegacyGroup::ContactEmail)
                    .to_owned(),
            )
            .await?;

        // Index: contact_phone
        manager
            .create_index(
                Index::create()
                    .name("idx_legacy_group_contact_phone")
                    .table(LegacyGroup::Table)
                    .col(LegacyGroup::ContactPhone)
                    .to_owned(),
            )
            .await?;

        // Create member table
        manager
            .create_table(
                Table::create()
                    .table(Member::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Member::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Member::RegistrationId).string_len(32))
                    .col(ColumnDef::new(Member::GroupId).string_len(32))
                    .col(ColumnDef::new(Member::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Member::Email).string_len(256).not_null())
                    .col(ColumnDef::new(Member::College).string_len(256).not_null())
                    .col(ColumnDef::new(Member::Phone).string_len(20))
                    .col(ColumnDef::new(Member::MemberOrder).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_registration")
                            .from(Member::Table, Member::RegistrationId)
                            .to(Registration::Table, Registration::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_legacy_group")
                            .from(Member::Table, Member::GroupId)
                            .to(LegacyGroup::Table, LegacyGroup::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: registration_id
        manager
            .create_index(
                Index::create()
                    .name("idx_member_registration_id")
                    .table(Member::Table)
                    .col(Member::RegistrationId)
                    .to_owned(),
            )
            .await?;

        // Index: group_id
        manager
            .create_index(
                Index::create()
                    .name("idx_member_group_id")
                    .table(Member::Table)
                    .col(Member::GroupId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Member::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LegacyGroup::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LegacyGroup {
    Table,
    Id,
    ContactEmail,
    ContactPhone,
    College,
    Status,
    TotalAmount,
    TransactionId,
    CreatedAt,
}

#[derive(Iden)]
enum Member {
    Table,
    Id,
    RegistrationId,
    GroupId,
    Name,
    Email,
    College,
    Phone,
    MemberOrder,
}

#[derive(Iden)]
enum Registration {
    Table,
    Id,
}
