//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_event_table;
mod m20260101_000002_create_registration_tables;
mod m20260101_000003_create_legacy_group_and_member_tables;
mod m20260101_000004_create_email_tables;
mod m20260101_000005_create_admin_identity_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_event_table::Migration),
            Box::new(m20260101_000002_create_registration_tables::Migration),
            Box::new(m20260101_000003_create_legacy_group_and_member_tables::Migration),
            Box::new(m20260101_000004_create_email_tables::Migration),
            Box::new(m20260101_000005_create_admin_identity_table::Migration),
        ]
    }
}
