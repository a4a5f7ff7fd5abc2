//! Duplicate-registration checker.
//!
//! Gates new submissions against existing records in both the unified and the
//! legacy shape. The check fails OPEN: when a lookup itself fails, the gate
//! allows the registration and flags the result as degraded instead of
//! blocking on infrastructure failure. The partial unique indexes on the
//! registration table remain the hard backstop.

use festa_db::repositories::{LegacyGroupRepository, RegistrationRepository};

use crate::services::canonical::{RegistrationRecord, normalize_email, normalize_phone};

/// Outcome of a pre-registration check.
#[derive(Debug, Clone)]
pub struct RegistrationGate {
    /// Whether a new registration may proceed.
    pub allowed: bool,
    /// True when at least one lookup failed and the gate fell open. Callers
    /// must not treat a degraded pass as a confirmed pass.
    pub degraded: bool,
    /// Identifier of the conflicting record when blocked.
    pub conflict: Option<String>,
}

impl RegistrationGate {
    const fn open(degraded: bool) -> Self {
        Self {
            allowed: true,
            degraded,
            conflict: None,
        }
    }

    const fn blocked(conflict: String, degraded: bool) -> Self {
        Self {
            allowed: false,
            degraded,
            conflict: Some(conflict),
        }
    }
}

/// Duplicate-registration checker over both historical shapes.
#[derive(Clone)]
pub struct DedupService {
    registrations: RegistrationRepository,
    legacy_groups: LegacyGroupRepository,
}

impl DedupService {
    /// Create a new duplicate-registration checker.
    #[must_use]
    pub const fn new(
        registrations: RegistrationRepository,
        legacy_groups: LegacyGroupRepository,
    ) -> Self {
        Self {
            registrations,
            legacy_groups,
        }
    }

    /// Check whether a new registration is allowed for this contact.
    ///
    /// Email is checked first, phone independently after; a non-rejected
    /// match in either shape blocks, first match wins.
    pub async fn check_can_register(&self, email: &str, phone: Option<&str>) -> RegistrationGate {
        let email = normalize_email(email);
        let mut degraded = false;

        if let Some(record) = self.lookup_by_email(&email, &mut degraded).await {
            return RegistrationGate::blocked(record.id, degraded);
        }

        if let Some(phone) = phone {
            let phone = normalize_phone(phone);
            if !phone.is_empty() {
                if let Some(record) = self.lookup_by_phone(&phone, &mut degraded).await {
                    return RegistrationGate::blocked(record.id, degraded);
                }
            }
        }

        RegistrationGate::open(degraded)
    }

    /// Check whether a payment reference is already cited by any record.
    /// Same fail-open policy as the contact check.
    pub async fn check_transaction_id_exists(&self, transaction_id: &str) -> RegistrationGate {
        let mut degraded = false;

        match self.registrations.find_by_transaction_id(transaction_id).await {
            Ok(Some(existing)) => return RegistrationGate::blocked(existing.id, degraded),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Transaction lookup failed; allowing registration");
                degraded = true;
            }
        }

        match self.legacy_groups.find_by_transaction_id(transaction_id).await {
            Ok(Some(existing)) => RegistrationGate::blocked(existing.id, degraded),
            Ok(None) => RegistrationGate::open(degraded),
            Err(e) => {
                tracing::warn!(error = %e, "Legacy transaction lookup failed; allowing registration");
                RegistrationGate::open(true)
            }
        }
    }

    async fn lookup_by_email(&self, email: &str, degraded: &mut bool) -> Option<RegistrationRecord> {
        match self.registrations.find_active_by_email(email).await {
            Ok(Some(existing)) => {
                if let Some(record) = blocking_record(existing.into()) {
                    return Some(record);
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Email duplicate check failed; allowing registration");
                *degraded = true;
            }
        }

        match self.legacy_groups.find_active_by_email(email).await {
            Ok(Some(existing)) => blocking_record(existing.into()),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Legacy email duplicate check failed; allowing registration");
                *degraded = true;
                None
            }
        }
    }

    async fn lookup_by_phone(&self, phone: &str, degraded: &mut bool) -> Option<RegistrationRecord> {
        match self.registrations.find_active_by_phone(phone).await {
            Ok(Some(existing)) => {
                if let Some(record) = blocking_record(existing.into()) {
                    return Some(record);
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Phone duplicate check failed; allowing registration");
                *degraded = true;
            }
        }

        match self.legacy_groups.find_active_by_phone(phone).await {
            Ok(Some(existing)) => blocking_record(existing.into()),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Legacy phone duplicate check failed; allowing registration");
                *degraded = true;
                None
            }
        }
    }
}

/// Rejected records never block a new registration.
fn blocking_record(record: RegistrationRecord) -> Option<RegistrationRecord> {
    record.blocks_new_registration().then_some(record)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use festa_db::entities::{legacy_group, registration, registration::RegistrationStatus};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, RuntimeErr};
    use std::sync::Arc;

    fn mock_registration(id: &str, status: RegistrationStatus) -> registration::Model {
        registration::Model {
            id: id.to_string(),
            name: "Priya".to_string(),
            email: "priya@x.edu".to_string(),
            phone: "9876543210".to_string(),
            college: "X College".to_string(),
            year: None,
            branch: None,
            tier: None,
            pass_type: None,
            pass_tier: None,
            total_amount: 800,
            transaction_id: "TXN12345678".to_string(),
            screenshot_key: "payments/k".to_string(),
            status,
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn mock_legacy_group(id: &str) -> legacy_group::Model {
        legacy_group::Model {
            id: id.to_string(),
            contact_email: Some("priya@x.edu".to_string()),
            contact_phone: Some("9876543210".to_string()),
            college: Some("X College".to_string()),
            status: RegistrationStatus::Pending,
            total_amount: 1200,
            transaction_id: None,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> DedupService {
        let db = Arc::new(db);
        DedupService::new(
            RegistrationRepository::new(db.clone()),
            LegacyGroupRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_unified_email_match_blocks() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_registration("reg1", RegistrationStatus::Pending)]])
            .into_connection();

        let gate = service(db)
            .check_can_register("priya@x.edu", Some("9876543210"))
            .await;

        assert!(!gate.allowed);
        assert!(!gate.degraded);
        assert_eq!(gate.conflict.as_deref(), Some("reg1"));
    }

    #[tokio::test]
    async fn test_legacy_email_match_blocks() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<registration::Model>::new()])
            .append_query_results([[mock_legacy_group("grp1")]])
            .into_connection();

        let gate = service(db).check_can_register("priya@x.edu", None).await;

        assert!(!gate.allowed);
        assert_eq!(gate.conflict.as_deref(), Some("grp1"));
    }

    #[tokio::test]
    async fn test_rejected_match_does_not_block() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_registration("reg1", RegistrationStatus::Rejected)]])
            .append_query_results([Vec::<legacy_group::Model>::new()])
            .into_connection();

        let gate = service(db).check_can_register("priya@x.edu", None).await;

        assert!(gate.allowed);
        assert!(gate.conflict.is_none());
    }

    #[tokio::test]
    async fn test_no_match_allows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<registration::Model>::new()])
            .append_query_results([Vec::<legacy_group::Model>::new()])
            .append_query_results([Vec::<registration::Model>::new()])
            .append_query_results([Vec::<legacy_group::Model>::new()])
            .into_connection();

        let gate = service(db)
            .check_can_register("new@x.edu", Some("9000000000"))
            .await;

        assert!(gate.allowed);
        assert!(!gate.degraded);
        assert!(gate.conflict.is_none());
    }

    #[tokio::test]
    async fn test_store_failure_fails_open_and_degrades() {
        let err = || DbErr::Query(RuntimeErr::Internal("connection refused".to_string()));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([err(), err(), err(), err()])
            .into_connection();

        let gate = service(db)
            .check_can_register("priya@x.edu", Some("9876543210"))
            .await;

        assert!(gate.allowed);
        assert!(gate.degraded);
    }

    #[tokio::test]
    async fn test_transaction_id_match_blocks() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_registration("reg1", RegistrationStatus::Pending)]])
            .into_connection();

        let gate = service(db).check_transaction_id_exists("TXN12345678").await;

        assert!(!gate.allowed);
        assert_eq!(gate.conflict.as_deref(), Some("reg1"));
    }

    #[tokio::test]
    async fn test_transaction_id_check_fails_open() {
        let err = || DbErr::Query(RuntimeErr::Internal("connection refused".to_string()));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([err(), err()])
            .into_connection();

        let gate = service(db).check_transaction_id_exists("TXN12345678").await;

        assert!(gate.allowed);
        assert!(gate.degraded);
    }
}
