use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Originating role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message exchanged in a conversation. Immutable once created.
///
/// Serializes to the `{"role": ..., "content": ...}` shape used both by the
/// history API and by the chat-completion wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChatRequest {
    /// Free-form user message
    #[validate(length(min = 1, max = 4000, message = "message must be 1-4000 characters"))]
    pub message: String,
    /// Optional explicit response language (e.g. "pidgin"); wins over detection
    #[serde(default)]
    pub language: Option<String>,
    /// Optional stable user identifier; enables conversation history
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HistoryQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub history: Vec<Turn>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub service: String,
    pub version: String,
    pub started_at: DateTime<Utc>,
}
