//! Legacy group repository (read-mostly historical shape).

use std::sync::Arc;

use crate::entities::{LegacyGroup, legacy_group, registration::RegistrationStatus};
use festa_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Legacy group repository for database operations.
#[derive(Clone)]
pub struct LegacyGroupRepository {
    db: Arc<DatabaseConnection>,
}

impl LegacyGroupRepository {
    /// Create a new legacy group repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the non-rejected legacy group for a contact email, if any.
    pub async fn find_active_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<legacy_group::Model>> {
        LegacyGroup::find()
            .filter(legacy_group::Column::ContactEmail.eq(email))
            .filter(legacy_group::Column::Status.ne(RegistrationStatus::Rejected))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the non-rejected legacy group for a contact phone, if any.
    pub async fn find_active_by_phone(
        &self,
        phone: &str,
    ) -> AppResult<Option<legacy_group::Model>> {
        LegacyGroup::find()
            .filter(legacy_group::Column::ContactPhone.eq(phone))
            .filter(legacy_group::Column::Status.ne(RegistrationStatus::Rejected))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a legacy group citing a transaction reference.
    pub async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> AppResult<Option<legacy_group::Model>> {
        LegacyGroup::find()
            .filter(legacy_group::Column::TransactionId.eq(transaction_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List every legacy group, oldest first (export order).
    pub async fn list_all(&self) -> AppResult<Vec<legacy_group::Model>> {
        LegacyGroup::find()
            .order_by_asc(legacy_group::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
