//! External auth provider client.
//!
//! Sessions are issued by an external provider; this client only verifies a
//! bearer token and returns the authenticated identity's email. Admin
//! privilege is decided afterwards by the admin directory.

use std::time::Duration;

use festa_common::{AppError, AppResult};
use serde::Deserialize;

use crate::services::canonical::normalize_email;

/// The authenticated identity behind a verified session.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthIdentity {
    /// Verified email of the session holder.
    pub email: String,
}

/// HTTP client for the external auth provider.
#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl AuthClient {
    /// Create a new auth client from configuration.
    #[must_use]
    pub fn new(config: &festa_common::AuthConfig) -> Self {
        Self {
            base_url: config.provider_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
            http_client: reqwest::Client::new(),
        }
    }

    /// Verify a session token against the provider.
    ///
    /// An invalid or expired token maps to `Unauthorized`; provider outages
    /// map to `ExternalService` so they are not mistaken for bad credentials.
    pub async fn verify_session(&self, token: &str) -> AppResult<AuthIdentity> {
        if token.trim().is_empty() {
            return Err(AppError::Unauthorized);
        }

        let response = self
            .http_client
            .get(format!("{}/user", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Auth provider unreachable: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AppError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Auth provider returned {status}: {body}"
            )));
        }

        let mut identity: AuthIdentity = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Malformed auth response: {e}")))?;
        identity.email = normalize_email(&identity.email);

        if identity.email.is_empty() {
            return Err(AppError::Unauthorized);
        }

        Ok(identity)
    }
}
