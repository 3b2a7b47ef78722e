use std::sync::Arc;

use axum::{Json, extract::State};

use crate::AppState;
use crate::models::HealthResponse;

/// Service banner
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service banner", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "NexaHealth Companion".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: state.started_at,
    })
}
