//! Notification dispatcher.
//!
//! Renders an admin-editable template from the store, sends it through the
//! email client, and writes an audit row for every attempt. A failed audit
//! write is traced but never propagated; notification plumbing must not crash
//! the operation that triggered it.

use std::collections::HashMap;

use chrono::Utc;
use festa_common::{AppError, AppResult};
use festa_db::entities::{email_log, email_log::DeliveryStatus};
use festa_db::repositories::{EmailLogRepository, EmailTemplateRepository};
use sea_orm::Set;

use crate::services::email::{EmailClient, EmailMessage};

/// Substitute `{{variable}}` placeholders. Unrecognized placeholders stay
/// verbatim; templates are admin-editable free text.
fn render(template: &str, vars: &HashMap<String, String>) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

/// Notification dispatcher over stored templates.
#[derive(Clone)]
pub struct NotificationService {
    templates: EmailTemplateRepository,
    logs: EmailLogRepository,
    email: EmailClient,
}

impl NotificationService {
    /// Create a new notification dispatcher.
    #[must_use]
    pub const fn new(
        templates: EmailTemplateRepository,
        logs: EmailLogRepository,
        email: EmailClient,
    ) -> Self {
        Self {
            templates,
            logs,
            email,
        }
    }

    /// Render the named template and send it to the recipient.
    ///
    /// Returns the provider message ID on success. An audit row is written
    /// whether the send succeeds or fails.
    pub async fn notify(
        &self,
        template_key: &str,
        recipient: &str,
        vars: &HashMap<String, String>,
    ) -> AppResult<Option<String>> {
        let template = self
            .templates
            .find_by_key(template_key)
            .await?
            .ok_or_else(|| AppError::TemplateNotFound(template_key.to_string()))?;

        let subject = render(&template.subject, vars);
        let html_body = render(&template.html_body, vars);

        let outcome = self
            .email
            .send(EmailMessage {
                to: recipient.to_string(),
                subject,
                html_body,
            })
            .await;

        let (status, error) = match &outcome {
            Ok(result) if result.success => (DeliveryStatus::Sent, None),
            Ok(result) => (DeliveryStatus::Failed, result.error.clone()),
            Err(e) => (DeliveryStatus::Failed, Some(e.to_string())),
        };

        let log = email_log::ActiveModel {
            id: Set(crate::generate_id()),
            template_key: Set(template_key.to_string()),
            recipient: Set(recipient.to_string()),
            status: Set(status),
            error: Set(error),
            created_at: Set(Utc::now().into()),
        };
        if let Err(e) = self.logs.create(log).await {
            tracing::warn!(error = %e, template_key, "Failed to write email audit log");
        }

        match outcome {
            Ok(result) if result.success => Ok(result.message_id),
            Ok(result) => Err(AppError::ExternalService(
                result
                    .error
                    .unwrap_or_else(|| "Email delivery failed".to_string()),
            )),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use festa_db::entities::email_template;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes_recognized_placeholders() {
        let out = render(
            "Hello {{name}}, your total is {{amount}}.",
            &vars(&[("name", "Priya"), ("amount", "800")]),
        );
        assert_eq!(out, "Hello Priya, your total is 800.");
    }

    #[test]
    fn test_render_leaves_unrecognized_placeholders_verbatim() {
        let out = render("Hello {{name}}, see {{mystery}}.", &vars(&[("name", "Priya")]));
        assert_eq!(out, "Hello Priya, see {{mystery}}.");
    }

    #[test]
    fn test_render_replaces_repeated_placeholders() {
        let out = render("{{name}} and {{name}}", &vars(&[("name", "Priya")]));
        assert_eq!(out, "Priya and Priya");
    }

    fn service(db: sea_orm::DatabaseConnection) -> NotificationService {
        let db = Arc::new(db);
        NotificationService::new(
            EmailTemplateRepository::new(db.clone()),
            EmailLogRepository::new(db),
            EmailClient::new(None),
        )
    }

    fn mock_template(key: &str) -> email_template::Model {
        email_template::Model {
            id: "tpl1".to_string(),
            key: key.to_string(),
            subject: "Approved, {{name}}!".to_string(),
            html_body: "<p>Hi {{name}}, total {{amount}}.</p>".to_string(),
            updated_at: None,
        }
    }

    fn mock_log(status: DeliveryStatus) -> email_log::Model {
        email_log::Model {
            id: "log1".to_string(),
            template_key: "approval_tier".to_string(),
            recipient: "priya@x.edu".to_string(),
            status,
            error: Some("Email delivery is not configured".to_string()),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_notify_missing_template_fails() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<email_template::Model>::new()])
            .into_connection();

        let result = service(db)
            .notify("no_such_template", "priya@x.edu", &HashMap::new())
            .await;

        assert!(matches!(result, Err(AppError::TemplateNotFound(_))));
    }

    #[tokio::test]
    async fn test_notify_logs_failed_attempt_when_delivery_unconfigured() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_template("approval_tier")]])
            .append_query_results([[mock_log(DeliveryStatus::Failed)]])
            .into_connection();

        let result = service(db)
            .notify(
                "approval_tier",
                "priya@x.edu",
                &vars(&[("name", "Priya"), ("amount", "800")]),
            )
            .await;

        // The audit row was written (mock consumed); the caller still sees
        // the delivery failure.
        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }
}
