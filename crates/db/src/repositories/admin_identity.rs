//! Admin identity repository.

use std::sync::Arc;

use crate::entities::{AdminIdentity, admin_identity};
use festa_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Admin identity repository for database operations.
#[derive(Clone)]
pub struct AdminIdentityRepository {
    db: Arc<DatabaseConnection>,
}

impl AdminIdentityRepository {
    /// Create a new admin identity repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All admin emails.
    pub async fn list_emails(&self) -> AppResult<Vec<String>> {
        let rows = AdminIdentity::find()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|r| r.email).collect())
    }

    /// Add an admin email.
    pub async fn create(
        &self,
        model: admin_identity::ActiveModel,
    ) -> AppResult<admin_identity::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove an admin by email.
    pub async fn delete_by_email(&self, email: &str) -> AppResult<u64> {
        let result = AdminIdentity::delete_many()
            .filter(admin_identity::Column::Email.eq(email))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
