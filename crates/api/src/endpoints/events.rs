//! Public event catalog endpoints.

use axum::{Router, extract::State, routing::get};
use festa_common::AppResult;
use festa_db::entities::event::{self, EventCategory};
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Create event router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_events))
}

/// Catalog event response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: i32,
    pub capacity: Option<i32>,
}

impl From<event::Model> for EventResponse {
    fn from(event: event::Model) -> Self {
        Self {
            id: event.id,
            name: event.name,
            category: match event.category {
                EventCategory::Technical => "technical".to_string(),
                EventCategory::Cultural => "cultural".to_string(),
                EventCategory::Sports => "sports".to_string(),
                EventCategory::Workshop => "workshop".to_string(),
            },
            price: event.price,
            capacity: event.capacity,
        }
    }
}

/// List active catalog events.
async fn list_events(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<EventResponse>>> {
    let events = state.registration_service.list_active_events().await?;
    Ok(ApiResponse::ok(events.into_iter().map(Into::into).collect()))
}
