//! Canonical registration records across the two historical data shapes.
//!
//! Registrations exist in two shapes: the unified `registration` table and the
//! legacy `legacy_group` table. Gating logic never touches either shape
//! directly; both are adapted into one read-only `RegistrationRecord`.

use festa_db::entities::{legacy_group, registration, registration::RegistrationStatus};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

/// Which table a canonical record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Unified,
    Legacy,
}

/// Canonical read-only view of a registration in either shape.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationRecord {
    pub id: String,
    pub source: RecordSource,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub status: RegistrationStatus,
    pub total_amount: i32,
    pub transaction_id: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

impl RegistrationRecord {
    /// Whether this record blocks a new registration for the same contact.
    #[must_use]
    pub fn blocks_new_registration(&self) -> bool {
        self.status != RegistrationStatus::Rejected
    }
}

impl From<registration::Model> for RegistrationRecord {
    fn from(model: registration::Model) -> Self {
        Self {
            id: model.id,
            source: RecordSource::Unified,
            email: Some(model.email),
            phone: Some(model.phone),
            college: Some(model.college),
            status: model.status,
            total_amount: model.total_amount,
            transaction_id: Some(model.transaction_id),
            created_at: model.created_at,
        }
    }
}

impl From<legacy_group::Model> for RegistrationRecord {
    fn from(model: legacy_group::Model) -> Self {
        Self {
            id: model.id,
            source: RecordSource::Legacy,
            email: model.contact_email,
            phone: model.contact_phone,
            college: model.college,
            status: model.status,
            total_amount: model.total_amount,
            transaction_id: model.transaction_id,
            created_at: model.created_at,
        }
    }
}

/// Lowercase, trimmed form of an email for comparison and storage.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Digits-only form of a phone number for comparison and storage.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn unified(status: RegistrationStatus) -> registration::Model {
        registration::Model {
            id: "reg1".to_string(),
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

    #[test]
    fn test_unified_adapter() {
        let record: RegistrationRecord = unified(RegistrationStatus::Pending).into();
        assert_eq!(record.source, RecordSource::Unified);
        assert_eq!(record.email.as_deref(), Some("priya@x.edu"));
        assert!(record.blocks_new_registration());
    }

    #[test]
    fn test_rejected_does_not_block() {
        let record: RegistrationRecord = unified(RegistrationStatus::Rejected).into();
        assert!(!record.blocks_new_registration());
    }

    #[test]
    fn test_legacy_adapter_tolerates_missing_email() {
        let record: RegistrationRecord = legacy_group::Model {
            id: "grp1".to_string(),
            contact_email: None,
            contact_phone: Some("9876543210".to_string()),
            college: None,
            status: RegistrationStatus::Approved,
            total_amount: 1200,
            transaction_id: None,
            created_at: Utc::now().into(),
        }
        .into();

        assert_eq!(record.source, RecordSource::Legacy);
        assert!(record.email.is_none());
        assert!(record.blocks_new_registration());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Priya@X.Edu "), "priya@x.edu");
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+91 98765-43210"), "919876543210");
        assert_eq!(normalize_phone("9876543210"), "9876543210");
    }
}
