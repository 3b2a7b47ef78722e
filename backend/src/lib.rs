//! NexaHealth Companion backend
//!
//! A thin glue layer in front of a hosted language model: detect the likely
//! language of an inbound chat message, compose a persona prompt with the
//! user's conversation history, call the remote chat-completion endpoint,
//! and re-render the raw reply into a structured, emoji-annotated message.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::services::ChatService;

/// Shared application state handed to every handler.
pub struct AppState {
    pub config: Config,
    pub chat_service: ChatService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config, chat_service: ChatService) -> Self {
        Self { config, chat_service, started_at: Utc::now() }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::chat::chat,
        handlers::chat::get_history,
        handlers::chat::clear_history,
        handlers::health::health,
    ),
    components(schemas(
        models::ChatRequest,
        models::ChatResponse,
        models::HistoryResponse,
        models::Turn,
        models::Role,
        models::HealthResponse,
    )),
    tags(
        (name = "Companion", description = "AI companion chat and history"),
        (name = "Health", description = "Service banner"),
    )
)]
pub struct ApiDoc;

/// Assemble the application router: companion routes, banner, Swagger UI,
/// request tracing and the configured CORS allow-list.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/api/companion/chat", post(handlers::chat::chat))
        .route(
            "/api/companion/history",
            get(handlers::chat::get_history).delete(handlers::chat::clear_history),
        )
        .route("/api/health", get(handlers::health::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
