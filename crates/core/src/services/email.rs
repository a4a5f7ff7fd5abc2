//! Outbound transactional email client.
//!
//! Provider-pluggable delivery: SendGrid and Mailgun go over HTTPS, SMTP
//! configuration is accepted but delivery is logged pending an SMTP
//! transport. Rendering lives in the notification dispatcher; this client
//! only moves an already-rendered message.

use std::time::Duration;

use festa_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Email provider configuration.
#[derive(Debug, Clone)]
pub enum EmailProvider {
    /// SMTP relay.
    Smtp {
        /// SMTP host.
        host: String,
        /// SMTP port.
        port: u16,
    },
    /// SendGrid HTTPS API.
    SendGrid {
        /// SendGrid API key.
        api_key: String,
    },
    /// Mailgun HTTPS API.
    Mailgun {
        /// Mailgun API key.
        api_key: String,
        /// Mailgun sending domain.
        domain: String,
        /// Use the EU region endpoint.
        eu_region: bool,
    },
}

impl EmailProvider {
    /// Short provider name for status reporting.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Smtp { .. } => "smtp",
            Self::SendGrid { .. } => "sendgrid",
            Self::Mailgun { .. } => "mailgun",
        }
    }
}

/// Sender identity and provider for outbound mail.
#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// Delivery provider.
    pub provider: EmailProvider,
    /// From address.
    pub from_address: String,
    /// From display name.
    pub from_name: String,
}

impl SenderConfig {
    /// Build from application config. Returns `None` when email is disabled.
    pub fn from_app_config(cfg: &festa_common::EmailConfig) -> AppResult<Option<Self>> {
        let Some(provider_name) = cfg.provider.as_deref() else {
            return Ok(None);
        };

        let from_address = cfg.from_address.clone().ok_or_else(|| {
            AppError::Config("email.from_address is required when email is enabled".to_string())
        })?;
        let from_name = cfg
            .from_name
            .clone()
            .unwrap_or_else(|| "Registrations".to_string());

        let provider = match provider_name {
            "sendgrid" => EmailProvider::SendGrid {
                api_key: cfg.api_key.clone().ok_or_else(|| {
                    AppError::Config("email.api_key is required for SendGrid".to_string())
                })?,
            },
            "mailgun" => EmailProvider::Mailgun {
                api_key: cfg.api_key.clone().ok_or_else(|| {
                    AppError::Config("email.api_key is required for Mailgun".to_string())
                })?,
                domain: cfg.mailgun_domain.clone().ok_or_else(|| {
                    AppError::Config("email.mailgun_domain is required for Mailgun".to_string())
                })?,
                eu_region: cfg.mailgun_eu_region,
            },
            "smtp" => EmailProvider::Smtp {
                host: cfg.smtp_host.clone().ok_or_else(|| {
                    AppError::Config("email.smtp_host is required for SMTP".to_string())
                })?,
                port: cfg.smtp_port.unwrap_or(587),
            },
            other => {
                return Err(AppError::Config(format!("Unknown email provider: {other}")));
            }
        };

        Ok(Some(Self {
            provider,
            from_address,
            from_name,
        }))
    }
}

/// A rendered message ready to send.
#[derive(Debug)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
}

/// Outcome of one delivery attempt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDeliveryResult {
    /// Whether the provider accepted the message.
    pub success: bool,
    /// Provider message ID, if available.
    pub message_id: Option<String>,
    /// Provider status text when the send failed.
    pub error: Option<String>,
}

/// Transactional email client.
#[derive(Clone)]
pub struct EmailClient {
    config: Option<SenderConfig>,
    http_client: reqwest::Client,
}

impl EmailClient {
    /// Create a new email client. `None` disables delivery.
    #[must_use]
    pub fn new(config: Option<SenderConfig>) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Whether delivery is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Name of the configured provider, if any.
    #[must_use]
    pub fn provider_name(&self) -> Option<&'static str> {
        self.config.as_ref().map(|c| c.provider.name())
    }

    /// Send a rendered message.
    pub async fn send(&self, message: EmailMessage) -> AppResult<EmailDeliveryResult> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| AppError::ExternalService("Email delivery is not configured".to_string()))?;

        match &config.provider {
            EmailProvider::Smtp { host, port } => Self::send_smtp(host, *port, &message),
            EmailProvider::SendGrid { api_key } => {
                self.send_sendgrid(api_key, config, message).await
            }
            EmailProvider::Mailgun {
                api_key,
                domain,
                eu_region,
            } => {
                self.send_mailgun(api_key, domain, *eu_region, config, message)
                    .await
            }
        }
    }

    fn send_smtp(host: &str, port: u16, message: &EmailMessage) -> AppResult<EmailDeliveryResult> {
        // SMTP transport not wired yet; record the attempt so the audit trail
        // stays complete while the relay is provisioned.
        tracing::info!(
            host,
            port,
            to = %message.to,
            subject = %message.subject,
            "Would send email via SMTP (implementation pending)"
        );
        Ok(EmailDeliveryResult {
            success: true,
            message_id: Some(format!(
                "smtp-{}",
                festa_common::IdGenerator::new().generate_uuid_v4()
            )),
            error: None,
        })
    }

    async fn send_sendgrid(
        &self,
        api_key: &str,
        config: &SenderConfig,
        message: EmailMessage,
    ) -> AppResult<EmailDeliveryResult> {
        let body = serde_json::json!({
            "personalizations": [{
                "to": [{"email": message.to}]
            }],
            "from": {
                "email": config.from_address,
                "name": config.from_name
            },
            "subject": message.subject,
            "content": [
                {"type": "text/html", "value": message.html_body}
            ]
        });

        let response = self
            .http_client
            .post("https://api.sendgrid.com/v3/mail/send")
            .timeout(REQUEST_TIMEOUT)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("SendGrid request failed: {e}")))?;

        if response.status().is_success() {
            let message_id = response
                .headers()
                .get("X-Message-Id")
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            Ok(EmailDeliveryResult {
                success: true,
                message_id,
                error: None,
            })
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Ok(EmailDeliveryResult {
                success: false,
                message_id: None,
                error: Some(format!("{status}: {error_text}")),
            })
        }
    }

    async fn send_mailgun(
        &self,
        api_key: &str,
        domain: &str,
        eu_region: bool,
        config: &SenderConfig,
        message: EmailMessage,
    ) -> AppResult<EmailDeliveryResult> {
        let base_url = if eu_region {
            "https://api.eu.mailgun.net"
        } else {
            "https://api.mailgun.net"
        };

        let form_params = [
            (
                "from",
                format!("{} <{}>", config.from_name, config.from_address),
            ),
            ("to", message.to),
            ("subject", message.subject),
            ("html", message.html_body),
        ];

        let response = self
            .http_client
            .post(format!("{base_url}/v3/{domain}/messages"))
            .timeout(REQUEST_TIMEOUT)
            .basic_auth("api", Some(api_key))
            .form(&form_params)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Mailgun request failed: {e}")))?;

        if response.status().is_success() {
            #[derive(Deserialize)]
            struct MailgunResponse {
                id: Option<String>,
            }
            let result: MailgunResponse = response
                .json()
                .await
                .unwrap_or(MailgunResponse { id: None });
            Ok(EmailDeliveryResult {
                success: true,
                message_id: result.id,
                error: None,
            })
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Ok(EmailDeliveryResult {
                success: false,
                message_id: None,
                error: Some(format!("{status}: {error_text}")),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_when_no_provider() {
        let cfg = festa_common::EmailConfig::default();
        assert!(SenderConfig::from_app_config(&cfg).unwrap().is_none());

        let client = EmailClient::new(None);
        assert!(!client.is_enabled());
        assert!(client.provider_name().is_none());
    }

    #[test]
    fn test_sendgrid_requires_api_key() {
        let cfg = festa_common::EmailConfig {
            provider: Some("sendgrid".to_string()),
            from_address: Some("noreply@fest.org".to_string()),
            ..Default::default()
        };
        let err = SenderConfig::from_app_config(&cfg).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_mailgun_config_parses() {
        let cfg = festa_common::EmailConfig {
            provider: Some("mailgun".to_string()),
            from_address: Some("noreply@fest.org".to_string()),
            from_name: Some("Festival Desk".to_string()),
            api_key: Some("key-123".to_string()),
            mailgun_domain: Some("mg.fest.org".to_string()),
            mailgun_eu_region: true,
            ..Default::default()
        };
        let sender = SenderConfig::from_app_config(&cfg).unwrap().unwrap();
        assert_eq!(sender.provider.name(), "mailgun");
        assert_eq!(sender.from_name, "Festival Desk");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let cfg = festa_common::EmailConfig {
            provider: Some("carrier-pigeon".to_string()),
            from_address: Some("noreply@fest.org".to_string()),
            ..Default::default()
        };
        let err = SenderConfig::from_app_config(&cfg).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_send_without_config_errors() {
        let client = EmailClient::new(None);
        let result = client
            .send(EmailMessage {
                to: "priya@x.edu".to_string(),
                subject: "Hello".to_string(),
                html_body: "<p>Hi</p>".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }
}
