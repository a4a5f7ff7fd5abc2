//! Registration repository.

use std::sync::Arc;

use crate::entities::{
    Registration, RegistrationEvent, registration, registration::RegistrationStatus,
    registration_event,
};
use festa_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Registration repository for database operations.
#[derive(Clone)]
pub struct RegistrationRepository {
    db: Arc<DatabaseConnection>,
}

impl RegistrationRepository {
    /// Create a new registration repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a registration by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<registration::Model>> {
        Registration::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a registration by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<registration::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::RegistrationNotFound(id.to_string()))
    }

    /// Find the non-rejected registration for an email, if any.
    pub async fn find_active_by_email(&self, email: &str) -> AppResult<Option<registration::Model>> {
        Registration::find()
            .filter(registration::Column::Email.eq(email))
            .filter(registration::Column::Status.ne(RegistrationStatus::Rejected))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the non-rejected registration for a phone number, if any.
    pub async fn find_active_by_phone(&self, phone: &str) -> AppResult<Option<registration::Model>> {
        Registration::find()
            .filter(registration::Column::Phone.eq(phone))
            .filter(registration::Column::Status.ne(RegistrationStatus::Rejected))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a registration citing a transaction reference.
    pub async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> AppResult<Option<registration::Model>> {
        Registration::find()
            .filter(registration::Column::TransactionId.eq(transaction_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the most recent registration for an email regardless of status.
    pub async fn find_latest_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<registration::Model>> {
        Registration::find()
            .filter(registration::Column::Email.eq(email))
            .order_by_desc(registration::Column::CreatedAt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new registration.
    pub async fn create(&self, model: registration::ActiveModel) -> AppResult<registration::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a registration.
    pub async fn update(&self, model: registration::ActiveModel) -> AppResult<registration::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a registration row by ID.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<()> {
        Registration::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List registrations with optional status filter, newest first.
    pub async fn list(
        &self,
        status: Option<RegistrationStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<registration::Model>> {
        let mut query =
            Registration::find().order_by_desc(registration::Column::CreatedAt);

        if let Some(s) = status {
            query = query.filter(registration::Column::Status.eq(s));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List every registration, oldest first (export order).
    pub async fn list_all(&self) -> AppResult<Vec<registration::Model>> {
        Registration::find()
            .order_by_asc(registration::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count registrations in a status.
    pub async fn count_by_status(&self, status: RegistrationStatus) -> AppResult<u64> {
        Registration::find()
            .filter(registration::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert line items for a registration.
    pub async fn insert_line_items(
        &self,
        items: Vec<registration_event::ActiveModel>,
    ) -> AppResult<()> {
        if items.is_empty() {
            return Ok(());
        }

        RegistrationEvent::insert_many(items)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Line items of one registration.
    pub async fn line_items(
        &self,
        registration: &registration::Model,
    ) -> AppResult<Vec<registration_event::Model>> {
        registration
            .find_related(RegistrationEvent)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every line item, for export flattening.
    pub async fn all_line_items(&self) -> AppResult<Vec<registration_event::Model>> {
        RegistrationEvent::find()
            .order_by_asc(registration_event::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
