//! Business logic services.

#![allow(missing_docs)]

pub mod admin_directory;
pub mod auth;
pub mod canonical;
pub mod dedup;
pub mod email;
pub mod export;
pub mod notification;
pub mod pricing;
pub mod registration;
pub mod review;

pub use admin_directory::AdminDirectory;
pub use auth::{AuthClient, AuthIdentity};
pub use canonical::{RecordSource, RegistrationRecord};
pub use dedup::{DedupService, RegistrationGate};
pub use email::{EmailClient, EmailDeliveryResult, EmailMessage, EmailProvider, SenderConfig};
pub use export::ExportService;
pub use notification::NotificationService;
pub use pricing::Selection;
pub use registration::{MemberInfo, ParticipantInfo, RegistrationService, SubmitRequest};
pub use review::{BulkApproveOutcome, RegistrationDetail, ReviewService};
