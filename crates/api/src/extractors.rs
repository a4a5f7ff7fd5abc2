//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use festa_core::AuthIdentity;

/// Authenticated session extractor.
#[derive(Debug, Clone)]
pub struct AuthSession(pub AuthIdentity);

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware after token verification.
        parts
            .extensions
            .get::<AuthIdentity>()
            .cloned()
            .map(AuthSession)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}
