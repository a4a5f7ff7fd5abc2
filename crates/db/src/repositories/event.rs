//! Event catalog repository.

use std::sync::Arc;

use crate::entities::{Event, event};
use festa_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Event repository for database operations.
#[derive(Clone)]
pub struct EventRepository {
    db: Arc<DatabaseConnection>,
}

impl EventRepository {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find events by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<event::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Event::find()
            .filter(event::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List active catalog events.
    pub async fn list_active(&self) -> AppResult<Vec<event::Model>> {
        Event::find()
            .filter(event::Column::IsActive.eq(true))
            .order_by_asc(event::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
