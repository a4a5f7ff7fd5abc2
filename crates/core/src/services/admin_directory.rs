//! Cached directory of admin emails.
//!
//! Admin privilege is an email's presence in the `admin_identity` table. The
//! set is cached process-wide with a TTL so every authenticated request does
//! not hit the database; mutations invalidate the cache explicitly.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use festa_common::{AppError, AppResult};
use festa_db::entities::admin_identity;
use festa_db::repositories::AdminIdentityRepository;
use sea_orm::Set;
use tokio::sync::RwLock;

use crate::services::canonical::normalize_email;

struct CacheState {
    emails: HashSet<String>,
    refreshed_at: Option<Instant>,
}

/// Process-wide admin email directory with TTL caching.
#[derive(Clone)]
pub struct AdminDirectory {
    repo: AdminIdentityRepository,
    ttl: Duration,
    cache: Arc<RwLock<CacheState>>,
}

impl AdminDirectory {
    /// Create a new directory. Call [`Self::refresh`] at startup to warm it.
    #[must_use]
    pub fn new(repo: AdminIdentityRepository, ttl: Duration) -> Self {
        Self {
            repo,
            ttl,
            cache: Arc::new(RwLock::new(CacheState {
                emails: HashSet::new(),
                refreshed_at: None,
            })),
        }
    }

    /// Reload the admin set from the store.
    pub async fn refresh(&self) -> AppResult<()> {
        let emails: HashSet<String> = self
            .repo
            .list_emails()
            .await?
            .iter()
            .map(|e| normalize_email(e))
            .collect();

        let mut state = self.cache.write().await;
        tracing::debug!(count = emails.len(), "Admin directory refreshed");
        state.emails = emails;
        state.refreshed_at = Some(Instant::now());
        Ok(())
    }

    /// Drop the cached snapshot; the next read reloads.
    pub async fn invalidate(&self) {
        self.cache.write().await.refreshed_at = None;
    }

    /// Whether the email belongs to an admin. Admin gating fails closed: a
    /// refresh error propagates instead of defaulting to non-admin silently.
    pub async fn is_admin(&self, email: &str) -> AppResult<bool> {
        self.ensure_fresh().await?;
        let state = self.cache.read().await;
        Ok(state.emails.contains(&normalize_email(email)))
    }

    /// Fail with `Forbidden` unless the email belongs to an admin.
    pub async fn require_admin(&self, email: &str) -> AppResult<()> {
        if self.is_admin(email).await? {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "admin privileges required".to_string(),
            ))
        }
    }

    /// Current admin emails, for the management listing.
    pub async fn list(&self) -> AppResult<Vec<String>> {
        self.ensure_fresh().await?;
        let state = self.cache.read().await;
        let mut emails: Vec<String> = state.emails.iter().cloned().collect();
        emails.sort();
        Ok(emails)
    }

    /// Add an admin email and invalidate the cache.
    pub async fn add(&self, email: &str, added_by: &str) -> AppResult<()> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AppError::Validation("email is required".to_string()));
        }

        self.repo
            .create(admin_identity::ActiveModel {
                id: Set(crate::generate_id()),
                email: Set(email.clone()),
                added_by: Set(Some(added_by.to_string())),
                created_at: Set(Utc::now().into()),
            })
            .await?;

        self.invalidate().await;
        tracing::info!(%email, added_by, "Admin added");
        Ok(())
    }

    /// Remove an admin email and invalidate the cache.
    pub async fn remove(&self, email: &str) -> AppResult<()> {
        let email = normalize_email(email);
        let removed = self.repo.delete_by_email(&email).await?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("admin {email} not found")));
        }

        self.invalidate().await;
        tracing::info!(%email, "Admin removed");
        Ok(())
    }

    async fn ensure_fresh(&self) -> AppResult<()> {
        {
            let state = self.cache.read().await;
            if let Some(refreshed_at) = state.refreshed_at {
                if refreshed_at.elapsed() < self.ttl {
                    return Ok(());
                }
            }
        }
        self.refresh().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn admin_row(id: &str, email: &str) -> admin_identity::Model {
        admin_identity::Model {
            id: id.to_string(),
            email: email.to_string(),
            added_by: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_is_admin_loads_on_first_read() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin_row("a1", "Admin@Fest.Org")]])
                .into_connection(),
        );
        let directory = AdminDirectory::new(
            AdminIdentityRepository::new(db),
            Duration::from_secs(300),
        );

        // Normalized on both sides of the comparison.
        assert!(directory.is_admin("admin@fest.org").await.unwrap());
        assert!(!directory.is_admin("visitor@x.edu").await.unwrap());
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin_row("a1", "admin@fest.org")]])
                .append_query_results([[
                    admin_row("a1", "admin@fest.org"),
                    admin_row("a2", "second@fest.org"),
                ]])
                .into_connection(),
        );
        let directory = AdminDirectory::new(
            AdminIdentityRepository::new(db),
            Duration::from_secs(300),
        );

        assert!(!directory.is_admin("second@fest.org").await.unwrap());
        directory.invalidate().await;
        assert!(directory.is_admin("second@fest.org").await.unwrap());
    }

    #[tokio::test]
    async fn test_require_admin_rejects_non_admin() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<admin_identity::Model>::new()])
                .into_connection(),
        );
        let directory = AdminDirectory::new(
            AdminIdentityRepository::new(db),
            Duration::from_secs(300),
        );

        let err = directory.require_admin("visitor@x.edu").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
