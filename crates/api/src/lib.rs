//! HTTP API layer for festa-rs.
//!
//! - **Endpoints**: public catalog/registration routes and the admin surface
//! - **Extractors**: authenticated session extraction
//! - **Middleware**: bearer-token verification against the auth provider
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
