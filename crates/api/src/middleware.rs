//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use festa_core::{
    AdminDirectory, AuthClient, ExportService, RegistrationService, ReviewService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub registration_service: RegistrationService,
    pub review_service: ReviewService,
    pub export_service: ExportService,
    pub admin_directory: AdminDirectory,
    pub auth_client: AuthClient,
}

/// Authentication middleware.
///
/// Verifies a bearer token against the external auth provider and stashes the
/// resulting identity in request extensions. Requests without a valid token
/// pass through unauthenticated; protected handlers reject via `AuthSession`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.auth_client.verify_session(token).await {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Session verification failed");
            }
        }
    }

    next.run(req).await
}
