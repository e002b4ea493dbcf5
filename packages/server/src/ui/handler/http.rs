//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::RosterDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current roster snapshot
pub async fn get_roster(State(state): State<Arc<AppState>>) -> Json<RosterDto> {
    // Domain Model から DTO への変換
    let users = state
        .coordinator
        .roster()
        .into_iter()
        .map(|name| name.into_string())
        .collect();

    Json(RosterDto { users })
}
