//! Member repository.

use std::sync::Arc;

use crate::entities::{Member, member};
use festa_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Member repository for database operations.
#[derive(Clone)]
pub struct MemberRepository {
    db: Arc<DatabaseConnection>,
}

impl MemberRepository {
    /// Create a new member repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert member rows in one statement.
    pub async fn insert_many(&self, members: Vec<member::ActiveModel>) -> AppResult<()> {
        if members.is_empty() {
            return Ok(());
        }

        Member::insert_many(members)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Members of a unified registration, in group order.
    pub async fn list_by_registration(&self, registration_id: &str) -> AppResult<Vec<member::Model>> {
        Member::find()
            .filter(member::Column::RegistrationId.eq(registration_id))
            .order_by_asc(member::Column::MemberOrder)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every member row, for export flattening.
    pub async fn list_all(&self) -> AppResult<Vec<member::Model>> {
        Member::find()
            .order_by_asc(member::Column::MemberOrder)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete all members of a unified registration. Must run before the
    /// registration row itself is removed.
    pub async fn delete_by_registration(&self, registration_id: &str) -> AppResult<u64> {
        let result = Member::delete_many()
            .filter(member::Column::RegistrationId.eq(registration_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
