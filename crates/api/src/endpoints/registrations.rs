//! Public registration endpoints.

use axum::{
    Router,
    extract::{Multipart, Query, State},
    routing::{get, post},
};
use festa_common::{AppError, AppResult};
use festa_core::{MemberInfo, ParticipantInfo, Selection, SubmitRequest};
use festa_db::entities::registration::{
    self, PassTier, PassType, RegistrationStatus, Tier,
};
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

/// Create registration router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_registration))
        .route("/can-register", get(can_register))
        .route("/status", get(registration_status))
}

/// Registration response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub year: Option<String>,
    pub branch: Option<String>,
    pub tier: Option<String>,
    pub pass_type: Option<String>,
    pub pass_tier: Option<String>,
    pub total_amount: i32,
    pub transaction_id: String,
    pub status: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: String,
}

impl From<registration::Model> for RegistrationResponse {
    fn from(model: registration::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            college: model.college,
            year: model.year,
            branch: model.branch,
            tier: model.tier.map(|t| tier_str(t).to_string()),
            pass_type: model.pass_type.map(|p| pass_type_str(p).to_string()),
            pass_tier: model.pass_tier.map(|p| pass_tier_str(p).to_string()),
            total_amount: model.total_amount,
            transaction_id: model.transaction_id,
            status: status_str(model.status).to_string(),
            reviewed_by: model.reviewed_by,
            reviewed_at: model.reviewed_at.map(|t| t.to_rfc3339()),
            rejection_reason: model.rejection_reason,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

pub(super) const fn status_str(status: RegistrationStatus) -> &'static str {
    match status {
        RegistrationStatus::Pending => "pending",
        RegistrationStatus::Approved => "approved",
        RegistrationStatus::Rejected => "rejected",
    }
}

const fn tier_str(tier: Tier) -> &'static str {
    match tier {
        Tier::Tier1 => "tier1",
        Tier::Tier2 => "tier2",
        Tier::Tier3 => "tier3",
    }
}

const fn pass_type_str(pass_type: PassType) -> &'static str {
    match pass_type {
        PassType::NexusForum => "nexus_forum",
        PassType::ProNite => "pro_nite",
        PassType::Esports => "esports",
    }
}

const fn pass_tier_str(pass_tier: PassTier) -> &'static str {
    match pass_tier {
        PassTier::Tier1 => "tier1",
        PassTier::Tier2 => "tier2",
        PassTier::Tier3 => "tier3",
    }
}

fn parse_tier(value: &str) -> AppResult<Tier> {
    match value {
        "tier1" => Ok(Tier::Tier1),
        "tier2" => Ok(Tier::Tier2),
        "tier3" => Ok(Tier::Tier3),
        other => Err(AppError::InvalidSelection(format!("unknown tier: {other}"))),
    }
}

fn parse_pass_type(value: &str) -> AppResult<PassType> {
    match value {
        "nexus_forum" => Ok(PassType::NexusForum),
        "pro_nite" => Ok(PassType::ProNite),
        "esports" => Ok(PassType::Esports),
        other => Err(AppError::InvalidSelection(format!("unknown pass: {other}"))),
    }
}

fn parse_pass_tier(value: &str) -> AppResult<PassTier> {
    match value {
        "tier1" => Ok(PassTier::Tier1),
        "tier2" => Ok(PassTier::Tier2),
        "tier3" => Ok(PassTier::Tier3),
        other => Err(AppError::InvalidSelection(format!(
            "unknown pass sub-tier: {other}"
        ))),
    }
}

/// One group member in the `members` form field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberField {
    name: String,
    email: String,
    college: String,
    #[serde(default)]
    phone: Option<String>,
}

#[derive(Default)]
struct SubmissionForm {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    college: Option<String>,
    year: Option<String>,
    branch: Option<String>,
    tier: Option<String>,
    pass_type: Option<String>,
    pass_tier: Option<String>,
    event_ids: Vec<String>,
    members: Vec<MemberField>,
    transaction_id: Option<String>,
    screenshot: Option<Vec<u8>>,
    screenshot_name: Option<String>,
    screenshot_content_type: Option<String>,
}

impl SubmissionForm {
    fn require(value: Option<String>, field: &str) -> AppResult<String> {
        value
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Validation(format!("{field} is required")))
    }

    fn into_request(self) -> AppResult<SubmitRequest> {
        let tier = self.tier.as_deref().map(parse_tier).transpose()?;
        let pass_type = self.pass_type.as_deref().map(parse_pass_type).transpose()?;
        let pass_tier = self.pass_tier.as_deref().map(parse_pass_tier).transpose()?;
        let selection = Selection::from_parts(tier, pass_type, pass_tier)?;

        let screenshot = self
            .screenshot
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| AppError::Validation("payment screenshot is required".to_string()))?;

        Ok(SubmitRequest {
            participant: ParticipantInfo {
                name: Self::require(self.name, "name")?,
                email: Self::require(self.email, "email")?,
                phone: Self::require(self.phone, "phone")?,
                college: Self::require(self.college, "college")?,
                year: self.year.filter(|v| !v.trim().is_empty()),
                branch: self.branch.filter(|v| !v.trim().is_empty()),
            },
            selection,
            event_ids: self.event_ids,
            members: self
                .members
                .into_iter()
                .map(|m| MemberInfo {
                    name: m.name,
                    email: m.email,
                    college: m.college,
                    phone: m.phone,
                })
                .collect(),
            transaction_id: Self::require(self.transaction_id, "transaction_id")?,
            screenshot,
            screenshot_name: self
                .screenshot_name
                .unwrap_or_else(|| "screenshot".to_string()),
            screenshot_content_type: self
                .screenshot_content_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
        })
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Submit a new registration via multipart form.
async fn submit_registration(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<RegistrationResponse>> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "screenshot" => {
                form.screenshot_name = field.file_name().map(std::string::ToString::to_string);
                form.screenshot_content_type =
                    field.content_type().map(std::string::ToString::to_string);
                form.screenshot = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?
                        .to_vec(),
                );
            }
            "name" => form.name = Some(read_text(field).await?),
            "email" => form.email = Some(read_text(field).await?),
            "phone" => form.phone = Some(read_text(field).await?),
            "college" => form.college = Some(read_text(field).await?),
            "year" => form.year = Some(read_text(field).await?),
            "branch" => form.branch = Some(read_text(field).await?),
            "tier" => form.tier = Some(read_text(field).await?),
            "pass_type" => form.pass_type = Some(read_text(field).await?),
            "pass_tier" => form.pass_tier = Some(read_text(field).await?),
            "transaction_id" => form.transaction_id = Some(read_text(field).await?),
            "event_ids" => {
                let text = read_text(field).await?;
                form.event_ids = text
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            "members" => {
                let text = read_text(field).await?;
                if !text.trim().is_empty() {
                    form.members = serde_json::from_str(&text).map_err(|e| {
                        AppError::Validation(format!("members must be a JSON array: {e}"))
                    })?;
                }
            }
            _ => {}
        }
    }

    let request = form.into_request()?;
    let created = state.registration_service.submit(request).await?;

    Ok(ApiResponse::ok(created.into()))
}

/// Pre-submission availability check.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanRegisterQuery {
    email: String,
    #[serde(default)]
    phone: Option<String>,
}

/// Availability response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanRegisterResponse {
    pub allowed: bool,
    pub degraded: bool,
    pub conflict: Option<String>,
}

async fn can_register(
    State(state): State<AppState>,
    Query(query): Query<CanRegisterQuery>,
) -> AppResult<ApiResponse<CanRegisterResponse>> {
    let gate = state
        .registration_service
        .can_register(&query.email, query.phone.as_deref())
        .await;

    Ok(ApiResponse::ok(CanRegisterResponse {
        allowed: gate.allowed,
        degraded: gate.degraded,
        conflict: gate.conflict,
    }))
}

/// Status lookup by email.
#[derive(Debug, Deserialize)]
struct StatusQuery {
    email: String,
}

async fn registration_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> AppResult<ApiResponse<RegistrationResponse>> {
    let registration = state
        .registration_service
        .status_by_email(&query.email)
        .await?
        .ok_or_else(|| AppError::RegistrationNotFound(query.email.clone()))?;

    Ok(ApiResponse::ok(registration.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn filled_form() -> SubmissionForm {
        SubmissionForm {
            name: Some("Priya".to_string()),
            email: Some("priya@x.edu".to_string()),
            phone: Some("9876543210".to_string()),
            college: Some("X College".to_string()),
            tier: Some("tier2".to_string()),
            transaction_id: Some("TXN12345678".to_string()),
            screenshot: Some(vec![1, 2, 3]),
            ..SubmissionForm::default()
        }
    }

    #[test]
    fn test_registration_response_serialization() {
        let response = RegistrationResponse::from(registration::Model {
            id: "reg1".to_string(),
            name: "Priya".to_string(),
            email: "priya@x.edu".to_string(),
            phone: "9876543210".to_string(),
            college: "X College".to_string(),
            year: None,
            branch: None,
            tier: Some(Tier::Tier2),
            pass_type: None,
            pass_tier: None,
            total_amount: 800,
            transaction_id: "TXN12345678".to_string(),
            screenshot_key: "payments/k".to_string(),
            status: RegistrationStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        });

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"totalAmount\":800"));
        assert!(json.contains("\"tier\":\"tier2\""));
        assert!(json.contains("\"status\":\"pending\""));
    }

    #[test]
    fn test_form_rejects_missing_screenshot() {
        let mut form = filled_form();
        form.screenshot = None;

        let err = form.into_request().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_form_rejects_tier_and_pass_together() {
        let mut form = filled_form();
        form.pass_type = Some("pro_nite".to_string());

        let err = form.into_request().unwrap_err();
        assert!(matches!(err, AppError::InvalidSelection(_)));
    }

    #[test]
    fn test_form_rejects_unknown_tier() {
        let mut form = filled_form();
        form.tier = Some("tier9".to_string());

        let err = form.into_request().unwrap_err();
        assert!(matches!(err, AppError::InvalidSelection(_)));
    }
}
