//! Admin review state machine.
//!
//! `pending -> approved` and `pending -> rejected` are the only transitions.
//! Approved and rejected are terminal; a rejected participant re-registers
//! instead of having the row reopened.

use std::collections::HashMap;

use chrono::Utc;
use festa_common::{AppError, AppResult};
use festa_db::entities::{
    member, registration,
    registration::{RegistrationStatus, Tier},
    registration_event,
};
use festa_db::repositories::{MemberRepository, RegistrationRepository};
use sea_orm::{IntoActiveModel, Set};
use serde::Serialize;

use crate::services::notification::NotificationService;

/// Template key for tier approvals.
pub const TEMPLATE_APPROVAL_TIER: &str = "approval_tier";
/// Template key for pass approvals.
pub const TEMPLATE_APPROVAL_PASS: &str = "approval_pass";

/// One failed identifier in a bulk approval.
#[derive(Debug, Clone, Serialize)]
pub struct BulkApproveFailure {
    pub id: String,
    pub error: String,
}

/// Outcome of a bulk approval: per-id independent, never all-or-nothing.
#[derive(Debug, Clone, Serialize)]
pub struct BulkApproveOutcome {
    /// Number of registrations approved.
    pub processed: usize,
    /// Identifiers that could not be approved, with reasons.
    pub failures: Vec<BulkApproveFailure>,
}

/// A registration with its dependent rows, for admin detail views.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationDetail {
    pub registration: registration::Model,
    pub members: Vec<member::Model>,
    pub events: Vec<registration_event::Model>,
}

/// Admin review service.
#[derive(Clone)]
pub struct ReviewService {
    registrations: RegistrationRepository,
    members: MemberRepository,
    notifications: NotificationService,
    festival_name: String,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub const fn new(
        registrations: RegistrationRepository,
        members: MemberRepository,
        notifications: NotificationService,
        festival_name: String,
    ) -> Self {
        Self {
            registrations,
            members,
            notifications,
            festival_name,
        }
    }

    /// Approve a pending registration.
    ///
    /// Sets reviewer and timestamp, clears any stale rejection reason, and
    /// dispatches the approval notification best-effort: a send failure is
    /// logged but never reverts the approval.
    pub async fn approve(
        &self,
        registration_id: &str,
        reviewer_email: &str,
    ) -> AppResult<registration::Model> {
        let existing = self.registrations.get_by_id(registration_id).await?;
        Self::require_pending(&existing, "approve")?;

        let now = Utc::now();
        let mut model = existing.into_active_model();
        model.status = Set(RegistrationStatus::Approved);
        model.reviewed_by = Set(Some(reviewer_email.to_string()));
        model.reviewed_at = Set(Some(now.into()));
        model.rejection_reason = Set(None);
        model.updated_at = Set(Some(now.into()));

        let approved = self.registrations.update(model).await?;

        tracing::info!(
            registration_id = %approved.id,
            reviewer = reviewer_email,
            "Registration approved"
        );

        self.dispatch_approval_notification(&approved).await;

        Ok(approved)
    }

    /// Reject a pending registration with a mandatory reason.
    pub async fn reject(
        &self,
        registration_id: &str,
        reviewer_email: &str,
        reason: &str,
    ) -> AppResult<registration::Model> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::MissingReason);
        }

        let existing = self.registrations.get_by_id(registration_id).await?;
        Self::require_pending(&existing, "reject")?;

        let now = Utc::now();
        let mut model = existing.into_active_model();
        model.status = Set(RegistrationStatus::Rejected);
        model.reviewed_by = Set(Some(reviewer_email.to_string()));
        model.reviewed_at = Set(Some(now.into()));
        model.rejection_reason = Set(Some(reason.to_string()));
        model.updated_at = Set(Some(now.into()));

        let rejected = self.registrations.update(model).await?;

        tracing::info!(
            registration_id = %rejected.id,
            reviewer = reviewer_email,
            "Registration rejected"
        );

        Ok(rejected)
    }

    /// Approve each identifier independently. One bad identifier never blocks
    /// the rest.
    pub async fn bulk_approve(
        &self,
        registration_ids: &[String],
        reviewer_email: &str,
    ) -> BulkApproveOutcome {
        let mut processed = 0;
        let mut failures = vec![];

        for id in registration_ids {
            match self.approve(id, reviewer_email).await {
                Ok(_) => processed += 1,
                Err(e) => failures.push(BulkApproveFailure {
                    id: id.clone(),
                    error: e.to_string(),
                }),
            }
        }

        BulkApproveOutcome {
            processed,
            failures,
        }
    }

    /// Admin delete: member rows first, then the registration.
    pub async fn delete(&self, registration_id: &str) -> AppResult<()> {
        // Confirm the row exists so a bad id surfaces as 404, not a no-op.
        self.registrations.get_by_id(registration_id).await?;

        self.members.delete_by_registration(registration_id).await?;
        self.registrations.delete_by_id(registration_id).await?;

        tracing::info!(registration_id, "Registration deleted");
        Ok(())
    }

    /// Paginated listing with optional status filter.
    pub async fn list(
        &self,
        status: Option<RegistrationStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<registration::Model>> {
        self.registrations.list(status, limit, offset).await
    }

    /// Pending review count for the admin dashboard.
    pub async fn pending_count(&self) -> AppResult<u64> {
        self.registrations
            .count_by_status(RegistrationStatus::Pending)
            .await
    }

    /// Full registration detail with members and event line items.
    pub async fn detail(&self, registration_id: &str) -> AppResult<RegistrationDetail> {
        let registration = self.registrations.get_by_id(registration_id).await?;
        let events = self.registrations.line_items(&registration).await?;
        let members = self.members.list_by_registration(registration_id).await?;

        Ok(RegistrationDetail {
            registration,
            members,
            events,
        })
    }

    fn require_pending(model: &registration::Model, operation: &str) -> AppResult<()> {
        if model.status == RegistrationStatus::Pending {
            return Ok(());
        }

        let current = match model.status {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        };
        Err(AppError::InvalidStateTransition(format!(
            "cannot {operation} a registration that is already {current}"
        )))
    }

    async fn dispatch_approval_notification(&self, approved: &registration::Model) {
        let template_key = if approved.tier.is_some() {
            TEMPLATE_APPROVAL_TIER
        } else {
            TEMPLATE_APPROVAL_PASS
        };

        let mut vars = HashMap::new();
        vars.insert("name".to_string(), approved.name.clone());
        vars.insert("registration_id".to_string(), approved.id.clone());
        vars.insert("amount".to_string(), approved.total_amount.to_string());
        vars.insert("festival".to_string(), self.festival_name.clone());
        if let Some(tier) = approved.tier {
            let label = match tier {
                Tier::Tier1 => "Tier 1",
                Tier::Tier2 => "Tier 2",
                Tier::Tier3 => "Tier 3",
            };
            vars.insert("tier".to_string(), label.to_string());
        }

        match self.registrations.line_items(approved).await {
            Ok(items) => {
                let names: Vec<&str> = items.iter().map(|i| i.event_name.as_str()).collect();
                vars.insert("events".to_string(), names.join(", "));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not load line items for approval email");
            }
        }

        if let Err(e) = self
            .notifications
            .notify(template_key, &approved.email, &vars)
            .await
        {
            tracing::warn!(
                registration_id = %approved.id,
                error = %e,
                "Approval notification failed; approval stands"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use festa_db::entities::email_template;
    use festa_db::repositories::{EmailLogRepository, EmailTemplateRepository};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    use crate::services::email::EmailClient;

    fn mock_registration(id: &str, status: RegistrationStatus) -> registration::Model {
        registration::Model {
            id: id.to_string(),
            name: "Priya".to_string(),
            email: "priya@x.edu".to_string(),
            phone: "9876543210".to_string(),
            college: "X College".to_string(),
            year: None,
            branch: None,
            tier: Some(Tier::Tier2),
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

    fn approved_registration(id: &str, reviewer: &str) -> registration::Model {
        let now = Utc::now();
        registration::Model {
            status: RegistrationStatus::Approved,
            reviewed_by: Some(reviewer.to_string()),
            reviewed_at: Some(now.into()),
            updated_at: Some(now.into()),
            ..mock_registration(id, RegistrationStatus::Pending)
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> ReviewService {
        let db = Arc::new(db);
        ReviewService::new(
            RegistrationRepository::new(db.clone()),
            MemberRepository::new(db.clone()),
            NotificationService::new(
                EmailTemplateRepository::new(db.clone()),
                EmailLogRepository::new(db),
                EmailClient::new(None),
            ),
            "Aakriti 2026".to_string(),
        )
    }

    #[tokio::test]
    async fn test_approve_pending_sets_reviewer_and_dispatches() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_registration("reg1", RegistrationStatus::Pending)]])
            .append_query_results([[approved_registration("reg1", "admin@fest.org")]])
            // Line items for the notification vars, then the missing template:
            // the send failure must not fail the approval.
            .append_query_results([Vec::<registration_event::Model>::new()])
            .append_query_results([Vec::<email_template::Model>::new()])
            .into_connection();

        let approved = service(db).approve("reg1", "admin@fest.org").await.unwrap();

        assert_eq!(approved.status, RegistrationStatus::Approved);
        assert_eq!(approved.reviewed_by.as_deref(), Some("admin@fest.org"));
        assert!(approved.reviewed_at.is_some());
        assert!(approved.rejection_reason.is_none());
    }

    #[tokio::test]
    async fn test_approve_already_approved_fails() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_registration("reg1", RegistrationStatus::Approved)]])
            .into_connection();

        let err = service(db)
            .approve("reg1", "admin@fest.org")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidStateTransition(_)));
    }

    #[tokio::test]
    async fn test_approve_missing_registration_fails() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<registration::Model>::new()])
            .into_connection();

        let err = service(db)
            .approve("ghost", "admin@fest.org")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RegistrationNotFound(_)));
    }

    #[tokio::test]
    async fn test_reject_without_reason_fails_without_touching_row() {
        // No query results appended: the reason check runs before any fetch.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(db)
            .reject("reg1", "admin@fest.org", "   ")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MissingReason));
    }

    #[tokio::test]
    async fn test_reject_pending_records_reason() {
        let now = Utc::now();
        let rejected = registration::Model {
            status: RegistrationStatus::Rejected,
            reviewed_by: Some("admin@fest.org".to_string()),
            reviewed_at: Some(now.into()),
            rejection_reason: Some("Illegible payment proof".to_string()),
            ..mock_registration("reg1", RegistrationStatus::Pending)
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_registration("reg1", RegistrationStatus::Pending)]])
            .append_query_results([[rejected]])
            .into_connection();

        let result = service(db)
            .reject("reg1", "admin@fest.org", "Illegible payment proof")
            .await
            .unwrap();

        assert_eq!(result.status, RegistrationStatus::Rejected);
        assert_eq!(
            result.rejection_reason.as_deref(),
            Some("Illegible payment proof")
        );
    }

    #[tokio::test]
    async fn test_bulk_approve_reports_per_id_failures() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // idValid: fetch, update, line items, missing template.
            .append_query_results([[mock_registration("idValid", RegistrationStatus::Pending)]])
            .append_query_results([[approved_registration("idValid", "admin@fest.org")]])
            .append_query_results([Vec::<registration_event::Model>::new()])
            .append_query_results([Vec::<email_template::Model>::new()])
            // idAlreadyApproved: fetch only.
            .append_query_results([[mock_registration(
                "idAlreadyApproved",
                RegistrationStatus::Approved,
            )]])
            // idMissing: empty fetch.
            .append_query_results([Vec::<registration::Model>::new()])
            .into_connection();

        let ids = vec![
            "idValid".to_string(),
            "idAlreadyApproved".to_string(),
            "idMissing".to_string(),
        ];
        let outcome = service(db).bulk_approve(&ids, "admin@fest.org").await;

        assert_eq!(outcome.processed, 1);
        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(outcome.failures[0].id, "idAlreadyApproved");
        assert_eq!(outcome.failures[1].id, "idMissing");
    }
}
