//! Common utilities and shared types for festa-rs.
//!
//! This crate provides foundational components used across all festa-rs crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Storage**: Payment-screenshot storage backends (local, S3-compatible)
//!
//! # Example
//!
//! ```no_run
//! use festa_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod storage;

pub use config::{AdminConfig, AuthConfig, Config, EmailConfig, FestivalConfig};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use storage::{
    LocalStorage, StorageBackend, StorageConfig, UploadedFile, generate_screenshot_key,
};
