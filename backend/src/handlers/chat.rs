//! AI Companion API Handlers
//!
//! REST API endpoints for the chat pipeline and per-user history.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::AppState;
use crate::models::{ChatRequest, ChatResponse, HistoryQuery, HistoryResponse};
use crate::utils::{ApiError, ApiResult};

/// Chat with the companion
#[utoipa::path(
    post,
    path = "/api/companion/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Formatted companion reply", body = ChatResponse),
        (status = 400, description = "Validation error"),
    ),
    tag = "Companion"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    payload
        .validate()
        .map_err(|e| ApiError::validation_error(e.to_string()))?;

    tracing::debug!(
        user_id = payload.user_id.as_deref().unwrap_or("-"),
        "Handling chat message ({} chars)",
        payload.message.len()
    );

    let response = state
        .chat_service
        .chat(
            &payload.message,
            payload.language.as_deref(),
            payload.user_id.as_deref(),
        )
        .await;

    Ok(Json(ChatResponse { response }))
}

/// Fetch conversation history for a user
#[utoipa::path(
    get,
    path = "/api/companion/history",
    params(("user_id" = String, Query, description = "User ID to fetch history for")),
    responses(
        (status = 200, description = "Ordered conversation turns", body = HistoryResponse)
    ),
    tag = "Companion"
)]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    tracing::debug!(user_id = %query.user_id, "Fetching chat history");
    let history = state.chat_service.history(&query.user_id).await;
    Ok(Json(HistoryResponse { history }))
}

/// Clear conversation history for a user
#[utoipa::path(
    delete,
    path = "/api/companion/history",
    params(("user_id" = String, Query, description = "User ID to clear history for")),
    responses(
        (status = 204, description = "History cleared")
    ),
    tag = "Companion"
)]
pub async fn clear_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> StatusCode {
    tracing::info!(user_id = %query.user_id, "Clearing chat history");
    state.chat_service.clear_history(&query.user_id).await;
    StatusCode::NO_CONTENT
}
