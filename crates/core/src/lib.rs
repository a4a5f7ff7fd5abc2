//! Core business logic for festa-rs.

pub mod services;

pub use services::*;

/// Generate a unique ID using ULID.
#[must_use]
pub fn generate_id() -> String {
    festa_common::IdGenerator::new().generate()
}
