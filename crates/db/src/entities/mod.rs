//! Database entities.

pub mod admin_identity;
pub mod email_log;
pub mod email_template;
pub mod event;
pub mod legacy_group;
pub mod member;
pub mod registration;
pub mod registration_event;

pub use admin_identity::Entity as AdminIdentity;
pub use email_log::Entity as EmailLog;
pub use email_template::Entity as EmailTemplate;
pub use event::Entity as Event;
pub use legacy_group::Entity as LegacyGroup;
pub use member::Entity as Member;
pub use registration::Entity as Registration;
pub use registration_event::Entity as RegistrationEvent;
