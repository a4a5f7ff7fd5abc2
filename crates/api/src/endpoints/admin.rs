//! Admin review and management endpoints.
//!
//! Every handler requires a verified session whose email is present in the
//! admin directory.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use festa_common::AppResult;
use festa_core::BulkApproveOutcome;
use festa_db::entities::{member, registration::RegistrationStatus, registration_event};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::registrations::RegistrationResponse;
use crate::{extractors::AuthSession, middleware::AppState, response::ApiResponse};

/// Create admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/registrations", get(list_registrations))
        .route("/registrations/{id}", get(registration_detail))
        .route("/registrations/{id}", delete(delete_registration))
        .route("/registrations/{id}/approve", post(approve_registration))
        .route("/registrations/{id}/reject", post(reject_registration))
        .route("/registrations/bulk-approve", post(bulk_approve))
        .route("/registrations/pending-count", get(pending_count))
        .route("/export", get(export_csv))
        .route("/admins", get(list_admins))
        .route("/admins", post(add_admin))
        .route("/admins/{email}", delete(remove_admin))
}

/// Listing request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    #[serde(default)]
    status: Option<String>,
    #[serde(default = "default_limit")]
    limit: u64,
    #[serde(default)]
    offset: u64,
}

const fn default_limit() -> u64 {
    50
}

/// Group member response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub college: String,
    pub phone: Option<String>,
    pub member_order: i32,
}

impl From<member::Model> for MemberResponse {
    fn from(model: member::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            college: model.college,
            phone: model.phone,
            member_order: model.member_order,
        }
    }
}

/// Event line-item response (price as snapshotted at registration).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemResponse {
    pub event_id: String,
    pub event_name: String,
    pub price: i32,
}

impl From<registration_event::Model> for LineItemResponse {
    fn from(model: registration_event::Model) -> Self {
        Self {
            event_id: model.event_id,
            event_name: model.event_name,
            price: model.price,
        }
    }
}

/// Registration with dependents.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDetailResponse {
    pub registration: RegistrationResponse,
    pub members: Vec<MemberResponse>,
    pub events: Vec<LineItemResponse>,
}

/// Reject request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RejectRequest {
    #[validate(length(min = 1, max = 500))]
    reason: String,
}

/// Bulk-approve request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct BulkApproveRequest {
    #[validate(length(min = 1, max = 100))]
    registration_ids: Vec<String>,
}

/// Admin-list mutation request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct AddAdminRequest {
    #[validate(email)]
    email: String,
}

/// Pending count response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PendingCountResponse {
    pending: u64,
}

fn parse_status(value: Option<&str>) -> Option<RegistrationStatus> {
    value.and_then(|s| match s {
        "pending" => Some(RegistrationStatus::Pending),
        "approved" => Some(RegistrationStatus::Approved),
        "rejected" => Some(RegistrationStatus::Rejected),
        _ => None,
    })
}

/// List registrations with optional status filter.
async fn list_registrations(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<RegistrationResponse>>> {
    state.admin_directory.require_admin(&session.email).await?;

    let status = parse_status(query.status.as_deref());
    let registrations = state
        .review_service
        .list(status, query.limit.min(200), query.offset)
        .await?;

    Ok(ApiResponse::ok(
        registrations.into_iter().map(Into::into).collect(),
    ))
}

/// Registration detail with members and event line items.
async fn registration_detail(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RegistrationDetailResponse>> {
    state.admin_directory.require_admin(&session.email).await?;

    let detail = state.review_service.detail(&id).await?;

    Ok(ApiResponse::ok(RegistrationDetailResponse {
        registration: detail.registration.into(),
        members: detail.members.into_iter().map(Into::into).collect(),
        events: detail.events.into_iter().map(Into::into).collect(),
    }))
}

/// Approve a pending registration.
async fn approve_registration(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RegistrationResponse>> {
    state.admin_directory.require_admin(&session.email).await?;

    let approved = state.review_service.approve(&id, &session.email).await?;
    Ok(ApiResponse::ok(approved.into()))
}

/// Reject a pending registration with a reason.
async fn reject_registration(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RejectRequest>,
) -> AppResult<ApiResponse<RegistrationResponse>> {
    state.admin_directory.require_admin(&session.email).await?;
    req.validate()?;

    let rejected = state
        .review_service
        .reject(&id, &session.email, &req.reason)
        .await?;
    Ok(ApiResponse::ok(rejected.into()))
}

/// Approve a batch of registrations independently.
async fn bulk_approve(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Json(req): Json<BulkApproveRequest>,
) -> AppResult<ApiResponse<BulkApproveOutcome>> {
    state.admin_directory.require_admin(&session.email).await?;
    req.validate()?;

    let outcome = state
        .review_service
        .bulk_approve(&req.registration_ids, &session.email)
        .await;
    Ok(ApiResponse::ok(outcome))
}

/// Delete a registration and its members.
async fn delete_registration(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.admin_directory.require_admin(&session.email).await?;

    state.review_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Pending review count.
async fn pending_count(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<PendingCountResponse>> {
    state.admin_directory.require_admin(&session.email).await?;

    let pending = state.review_service.pending_count().await?;
    Ok(ApiResponse::ok(PendingCountResponse { pending }))
}

/// Export every registration as CSV.
async fn export_csv(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
) -> AppResult<Response> {
    state.admin_directory.require_admin(&session.email).await?;

    let csv = state.export_service.export_all().await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"registrations.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// List admin emails.
async fn list_admins(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<String>>> {
    state.admin_directory.require_admin(&session.email).await?;

    let admins = state.admin_directory.list().await?;
    Ok(ApiResponse::ok(admins))
}

/// Add an admin email; invalidates the directory cache.
async fn add_admin(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Json(req): Json<AddAdminRequest>,
) -> AppResult<StatusCode> {
    state.admin_directory.require_admin(&session.email).await?;
    req.validate()?;

    state.admin_directory.add(&req.email, &session.email).await?;
    Ok(StatusCode::CREATED)
}

/// Remove an admin email; invalidates the directory cache.
async fn remove_admin(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<StatusCode> {
    state.admin_directory.require_admin(&session.email).await?;

    state.admin_directory.remove(&email).await?;
    Ok(StatusCode::NO_CONTENT)
}
