//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use shared::types::ApiResponse;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check database connectivity
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected".to_string(),
        Err(_) => "disconnected".to_string(),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    })
}

/// Root liveness endpoint
pub async fn root() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("API is working"))
}
