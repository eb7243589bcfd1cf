//! Calendar handlers, mounted under every role prefix

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::calendar::CreateEventInput;
use crate::AppState;
use shared::models::CalendarEvent;
use shared::types::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct AddEventRequest {
    pub event: CreateEventInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEventRequest {
    pub calendar_id: Uuid,
}

/// POST /{role}/add-calendar-event
pub async fn add_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<AddEventRequest>,
) -> AppResult<Json<ApiResponse<Vec<CalendarEvent>>>> {
    let calendar = state.calendar();

    calendar.add(user.id, user.role, body.event).await?;
    let events = calendar.list(user.id, user.role).await?;

    Ok(Json(ApiResponse::data(
        "Calendar added successfully!",
        events,
    )))
}

/// POST /{role}/get-calendar-event
pub async fn get_events(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<CalendarEvent>>>> {
    let events = state.calendar().list(user.id, user.role).await?;

    Ok(Json(ApiResponse::data(
        "Calendar events fetched successfully!",
        events,
    )))
}

/// DELETE /{role}/delete-calendar-event
pub async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<DeleteEventRequest>,
) -> AppResult<Json<ApiResponse<Vec<CalendarEvent>>>> {
    let calendar = state.calendar();

    calendar.delete(body.calendar_id, user.id, user.role).await?;
    let events = calendar.list(user.id, user.role).await?;

    Ok(Json(ApiResponse::data(
        "Calendar event deleted successfully!",
        events,
    )))
}
