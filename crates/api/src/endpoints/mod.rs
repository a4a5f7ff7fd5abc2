//! API endpoints.

mod admin;
mod events;
mod registrations;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/events", events::router())
        .nest("/registrations", registrations::router())
        .nest("/admin", admin::router())
}
