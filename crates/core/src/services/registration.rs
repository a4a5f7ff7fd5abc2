//! Registration submission pipeline.
//!
//! `submit` runs validation and the duplicate gate before any side effect,
//! uploads the payment proof, snapshots event prices, then writes the
//! registration and its dependent rows. Dependent-row failure triggers a
//! compensating delete of the registration so a group row never survives
//! without its members.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use festa_common::{AppError, AppResult, StorageBackend, generate_screenshot_key};
use festa_db::entities::{event, member, registration, registration_event};
use festa_db::repositories::{EventRepository, MemberRepository, RegistrationRepository};
use sea_orm::Set;
use validator::Validate;

use crate::services::canonical::{normalize_email, normalize_phone};
use crate::services::dedup::{DedupService, RegistrationGate};
use crate::services::pricing::{self, Selection};

/// Participant contact details as submitted.
#[derive(Debug, Clone, Validate)]
pub struct ParticipantInfo {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 10, max = 15))]
    pub phone: String,

    #[validate(length(min = 1, max = 200))]
    pub college: String,

    pub year: Option<String>,
    pub branch: Option<String>,
}

/// One group member as submitted.
#[derive(Debug, Clone, Validate)]
pub struct MemberInfo {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 200))]
    pub college: String,

    pub phone: Option<String>,
}

/// A complete submission.
#[derive(Debug, Validate)]
pub struct SubmitRequest {
    #[validate(nested)]
    pub participant: ParticipantInfo,

    pub selection: Selection,
    pub event_ids: Vec<String>,

    #[validate(nested)]
    pub members: Vec<MemberInfo>,

    #[validate(length(min = 8, max = 50))]
    pub transaction_id: String,

    pub screenshot: Vec<u8>,
    pub screenshot_name: String,
    pub screenshot_content_type: String,
}

/// Registration writer.
#[derive(Clone)]
pub struct RegistrationService {
    registrations: RegistrationRepository,
    members: MemberRepository,
    events: EventRepository,
    dedup: DedupService,
    storage: Arc<dyn StorageBackend>,
}

impl RegistrationService {
    /// Create a new registration writer.
    #[must_use]
    pub fn new(
        registrations: RegistrationRepository,
        members: MemberRepository,
        events: EventRepository,
        dedup: DedupService,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            registrations,
            members,
            events,
            dedup,
            storage,
        }
    }

    /// Submit a new registration. Returns the created pending row.
    ///
    /// No email is sent on submission; approval triggers the notification.
    pub async fn submit(&self, mut request: SubmitRequest) -> AppResult<registration::Model> {
        request.transaction_id = request.transaction_id.trim().to_string();
        request.validate()?;
        let transaction_id = request.transaction_id.clone();

        let email = normalize_email(&request.participant.email);
        let phone = normalize_phone(&request.participant.phone);
        if email.is_empty() || phone.is_empty() {
            return Err(AppError::Validation(
                "email and phone are required".to_string(),
            ));
        }

        let gate = self.dedup.check_can_register(&email, Some(&phone)).await;
        if !gate.allowed {
            return Err(AppError::DuplicateRegistration {
                conflict: gate.conflict.unwrap_or_default(),
            });
        }
        if gate.degraded {
            tracing::warn!(%email, "Duplicate check degraded; accepting registration");
        }

        let txn_gate = self.dedup.check_transaction_id_exists(&transaction_id).await;
        if !txn_gate.allowed {
            return Err(AppError::Conflict(
                "this transaction reference is already in use".to_string(),
            ));
        }

        // Upload before any row is written; a storage failure leaves no trace
        // in the database.
        let key = generate_screenshot_key(&email, &request.screenshot_name);
        let uploaded = self
            .storage
            .upload(
                &key,
                &request.screenshot,
                &request.screenshot_content_type,
            )
            .await?;

        let snapshots = self.resolve_events(&request.event_ids).await?;
        let event_prices: Vec<i32> = snapshots.iter().map(|e| e.price).collect();
        let total_amount = pricing::compute_amount(&request.selection, &event_prices)?;

        let now = Utc::now();
        let registration_id = crate::generate_id();
        let (pass_type, pass_tier) = match request.selection.pass() {
            Some((pass_type, pass_tier)) => (Some(pass_type), pass_tier),
            None => (None, None),
        };

        let created = self
            .registrations
            .create(registration::ActiveModel {
                id: Set(registration_id.clone()),
                name: Set(request.participant.name.trim().to_string()),
                email: Set(email),
                phone: Set(phone),
                college: Set(request.participant.college.trim().to_string()),
                year: Set(request.participant.year),
                branch: Set(request.participant.branch),
                tier: Set(request.selection.tier()),
                pass_type: Set(pass_type),
                pass_tier: Set(pass_tier),
                total_amount: Set(total_amount),
                transaction_id: Set(transaction_id),
                screenshot_key: Set(uploaded.key),
                status: Set(registration::RegistrationStatus::Pending),
                reviewed_by: Set(None),
                reviewed_at: Set(None),
                rejection_reason: Set(None),
                created_at: Set(now.into()),
                updated_at: Set(None),
            })
            .await?;

        let line_items: Vec<registration_event::ActiveModel> = snapshots
            .iter()
            .map(|event| registration_event::ActiveModel {
                id: Set(crate::generate_id()),
                registration_id: Set(registration_id.clone()),
                event_id: Set(event.id.clone()),
                event_name: Set(event.name.clone()),
                price: Set(event.price),
            })
            .collect();

        if let Err(e) = self.registrations.insert_line_items(line_items).await {
            return self.compensate(&registration_id, "event line items", e).await;
        }

        let member_rows: Vec<member::ActiveModel> = request
            .members
            .iter()
            .enumerate()
            .map(|(index, m)| member::ActiveModel {
                id: Set(crate::generate_id()),
                registration_id: Set(Some(registration_id.clone())),
                group_id: Set(None),
                name: Set(m.name.trim().to_string()),
                email: Set(normalize_email(&m.email)),
                college: Set(m.college.trim().to_string()),
                phone: Set(m.phone.as_deref().map(normalize_phone)),
                member_order: Set(i32::try_from(index + 1).unwrap_or(i32::MAX)),
            })
            .collect();

        if let Err(e) = self.members.insert_many(member_rows).await {
            return self.compensate(&registration_id, "member rows", e).await;
        }

        tracing::info!(
            registration_id = %created.id,
            total_amount,
            "Registration submitted"
        );

        Ok(created)
    }

    /// Pre-submission availability check for the public form.
    pub async fn can_register(&self, email: &str, phone: Option<&str>) -> RegistrationGate {
        self.dedup.check_can_register(email, phone).await
    }

    /// Most recent registration for an email, regardless of status.
    pub async fn status_by_email(&self, email: &str) -> AppResult<Option<registration::Model>> {
        self.registrations
            .find_latest_by_email(&normalize_email(email))
            .await
    }

    /// Active catalog events for the public listing.
    pub async fn list_active_events(&self) -> AppResult<Vec<event::Model>> {
        self.events.list_active().await
    }

    /// Resolve event ids to catalog rows, preserving request order.
    async fn resolve_events(&self, event_ids: &[String]) -> AppResult<Vec<event::Model>> {
        if event_ids.is_empty() {
            return Ok(vec![]);
        }

        let found = self.events.find_by_ids(event_ids).await?;
        let by_id: HashMap<&str, &event::Model> =
            found.iter().map(|e| (e.id.as_str(), e)).collect();

        event_ids
            .iter()
            .map(|id| {
                by_id
                    .get(id.as_str())
                    .map(|e| (*e).clone())
                    .ok_or_else(|| AppError::UnknownEvent(id.clone()))
            })
            .collect()
    }

    /// Delete the just-created registration after a dependent write failed.
    async fn compensate(
        &self,
        registration_id: &str,
        stage: &str,
        cause: AppError,
    ) -> AppResult<registration::Model> {
        tracing::error!(
            registration_id,
            stage,
            error = %cause,
            "Dependent write failed; rolling back registration"
        );

        if let Err(e) = self.registrations.delete_by_id(registration_id).await {
            tracing::error!(
                registration_id,
                error = %e,
                "Compensating delete failed; registration left without dependents"
            );
        }

        Err(AppError::PartialWriteFailed(format!(
            "failed to write {stage}: {cause}"
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use festa_common::UploadedFile;
    use festa_db::entities::registration::{RegistrationStatus, Tier};
    use festa_db::entities::{event::EventCategory, legacy_group};
    use festa_db::repositories::LegacyGroupRepository;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct MemoryStorage {
        files: Mutex<Vec<String>>,
        fail: bool,
    }

    impl MemoryStorage {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                files: Mutex::new(vec![]),
                fail,
            })
        }
    }

    #[async_trait]
    impl StorageBackend for MemoryStorage {
        async fn upload(
            &self,
            key: &str,
            data: &[u8],
            content_type: &str,
        ) -> AppResult<UploadedFile> {
            if self.fail {
                return Err(AppError::UploadFailed("disk full".to_string()));
            }
            self.files.lock().await.push(key.to_string());
            Ok(UploadedFile {
                key: key.to_string(),
                url: format!("/uploads/{key}"),
                size: data.len() as u64,
                content_type: content_type.to_string(),
                md5: String::new(),
            })
        }

        async fn delete(&self, _key: &str) -> AppResult<()> {
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            format!("/uploads/{key}")
        }

        async fn exists(&self, key: &str) -> AppResult<bool> {
            Ok(self.files.lock().await.contains(&key.to_string()))
        }
    }

    fn participant() -> ParticipantInfo {
        ParticipantInfo {
            name: "Priya".to_string(),
            email: "priya@x.edu".to_string(),
            phone: "9876543210".to_string(),
            college: "X College".to_string(),
            year: Some("3".to_string()),
            branch: Some("CSE".to_string()),
        }
    }

    fn request(event_ids: Vec<String>, members: Vec<MemberInfo>) -> SubmitRequest {
        SubmitRequest {
            participant: participant(),
            selection: Selection::Tier { tier: Tier::Tier2 },
            event_ids,
            members,
            transaction_id: "TXN12345678".to_string(),
            screenshot: vec![0xFF, 0xD8],
            screenshot_name: "proof.jpg".to_string(),
            screenshot_content_type: "image/jpeg".to_string(),
        }
    }

    fn mock_event(id: &str, price: i32) -> event::Model {
        event::Model {
            id: id.to_string(),
            name: "Robo Race".to_string(),
            category: EventCategory::Technical,
            price,
            is_active: true,
            capacity: None,
            created_at: Utc::now().into(),
        }
    }

    fn mock_registration(id: &str, total: i32) -> registration::Model {
        registration::Model {
            id: id.to_string(),
            name: "Priya".to_string(),
            email: "priya@x.edu".to_string(),
            phone: "9876543210".to_string(),
            college: "X College".to_string(),
            year: Some("3".to_string()),
            branch: Some("CSE".to_string()),
            tier: Some(Tier::Tier2),
            pass_type: None,
            pass_tier: None,
            total_amount: total,
            transaction_id: "TXN12345678".to_string(),
            screenshot_key: "payments/k".to_string(),
            status: RegistrationStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(
        db: sea_orm::DatabaseConnection,
        storage: Arc<MemoryStorage>,
    ) -> RegistrationService {
        let db = Arc::new(db);
        RegistrationService::new(
            RegistrationRepository::new(db.clone()),
            MemberRepository::new(db.clone()),
            EventRepository::new(db.clone()),
            DedupService::new(
                RegistrationRepository::new(db.clone()),
                LegacyGroupRepository::new(db),
            ),
            storage,
        )
    }

    fn no_conflicts(db: MockDatabase) -> MockDatabase {
        // Dedup email (unified, legacy), phone (unified, legacy), then the
        // transaction-reference check (unified, legacy).
        db.append_query_results([Vec::<registration::Model>::new()])
            .append_query_results([Vec::<legacy_group::Model>::new()])
            .append_query_results([Vec::<registration::Model>::new()])
            .append_query_results([Vec::<legacy_group::Model>::new()])
            .append_query_results([Vec::<registration::Model>::new()])
            .append_query_results([Vec::<legacy_group::Model>::new()])
    }

    #[tokio::test]
    async fn test_submit_tier_with_event_totals_and_stays_pending() {
        let storage = MemoryStorage::new(false);
        let db = no_conflicts(MockDatabase::new(DatabaseBackend::Postgres))
            .append_query_results([[mock_event("ev1", 150)]])
            .append_query_results([[mock_registration("reg1", 800)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let created = service(db, storage.clone())
            .submit(request(vec!["ev1".to_string()], vec![]))
            .await
            .unwrap();

        assert_eq!(created.total_amount, 800);
        assert_eq!(created.status, RegistrationStatus::Pending);
        assert_eq!(storage.files.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_blocked_by_existing_registration() {
        let storage = MemoryStorage::new(false);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_registration("existing", 800)]])
            .into_connection();

        let err = service(db, storage.clone())
            .submit(request(vec![], vec![]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::DuplicateRegistration { ref conflict } if conflict == "existing"
        ));
        // Blocked before any upload.
        assert!(storage.files.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejects_short_transaction_id_before_side_effects() {
        let storage = MemoryStorage::new(false);
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let mut req = request(vec![], vec![]);
        req.transaction_id = "short".to_string();

        let err = service(db, storage.clone()).submit(req).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(storage.files.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejects_malformed_email_before_side_effects() {
        let storage = MemoryStorage::new(false);
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let mut req = request(vec![], vec![]);
        req.participant.email = "not-an-email".to_string();

        let err = service(db, storage.clone()).submit(req).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(storage.files.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_unknown_event_fails() {
        let storage = MemoryStorage::new(false);
        let db = no_conflicts(MockDatabase::new(DatabaseBackend::Postgres))
            .append_query_results([Vec::<event::Model>::new()])
            .into_connection();

        let err = service(db, storage)
            .submit(request(vec!["ghost".to_string()], vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UnknownEvent(ref id) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_submit_upload_failure_aborts_before_rows() {
        let storage = MemoryStorage::new(true);
        let db = no_conflicts(MockDatabase::new(DatabaseBackend::Postgres)).into_connection();

        let err = service(db, storage)
            .submit(request(vec![], vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UploadFailed(_)));
    }

    #[tokio::test]
    async fn test_member_write_failure_rolls_back_registration() {
        let storage = MemoryStorage::new(false);
        let db = no_conflicts(MockDatabase::new(DatabaseBackend::Postgres))
            .append_query_results([[mock_registration("reg1", 650)]])
            .append_exec_errors([DbErr::Query(RuntimeErr::Internal(
                "member insert failed".to_string(),
            ))])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let members = vec![MemberInfo {
            name: "Rahul".to_string(),
            email: "rahul@x.edu".to_string(),
            college: "X College".to_string(),
            phone: None,
        }];

        let err = service(db, storage)
            .submit(request(vec![], members))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PartialWriteFailed(_)));
    }
}
