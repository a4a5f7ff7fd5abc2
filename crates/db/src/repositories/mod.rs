//! Repository layer.

mod admin_identity;
mod email;
mod event;
mod legacy_group;
mod member;
mod registration;

pub use admin_identity::AdminIdentityRepository;
pub use email::{EmailLogRepository, EmailTemplateRepository};
pub use event::EventRepository;
pub use legacy_group::LegacyGroupRepository;
pub use member::MemberRepository;
pub use registration::RegistrationRepository;
