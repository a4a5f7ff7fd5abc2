//! Email template and audit-log repositories.

use std::sync::Arc;

use crate::entities::{EmailTemplate, email_log, email_template};
use festa_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Email template repository for database operations.
#[derive(Clone)]
pub struct EmailTemplateRepository {
    db: Arc<DatabaseConnection>,
}

impl EmailTemplateRepository {
    /// Create a new email template repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a template by its key.
    pub async fn find_by_key(&self, key: &str) -> AppResult<Option<email_template::Model>> {
        EmailTemplate::find()
            .filter(email_template::Column::Key.eq(key))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Email audit-log repository for database operations.
#[derive(Clone)]
pub struct EmailLogRepository {
    db: Arc<DatabaseConnection>,
}

impl EmailLogRepository {
    /// Create a new email log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert an audit row.
    pub async fn create(&self, model: email_log::ActiveModel) -> AppResult<email_log::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
