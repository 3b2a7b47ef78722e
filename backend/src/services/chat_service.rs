//! Chat pipeline orchestrator
//!
//! detect language -> compose prompt -> call remote model -> format reply.
//! This is the boundary where inference failures stop: whatever goes wrong
//! past the composer, the caller gets a formatted, language-aware fallback
//! instead of an error.

use std::sync::Arc;

use crate::models::Turn;
use crate::services::formatter;
use crate::services::history::ConversationStore;
use crate::services::language;
use crate::services::llm::{CompletionOptions, InferenceClient, compose};

pub struct ChatService {
    client: Arc<dyn InferenceClient>,
    store: Arc<dyn ConversationStore>,
    options: CompletionOptions,
}

impl ChatService {
    pub fn new(
        client: Arc<dyn InferenceClient>,
        store: Arc<dyn ConversationStore>,
        options: CompletionOptions,
    ) -> Self {
        Self { client, store, options }
    }

    /// Produce a formatted reply for one inbound message.
    ///
    /// Infallible at this boundary: inference failures degrade to the
    /// language-aware fallback message. History is only appended when the
    /// remote call succeeded, so a retry sees a clean conversation. The
    /// assistant turn stores the raw model text; formatting is applied per
    /// response, not persisted.
    pub async fn chat(
        &self,
        message: &str,
        language_hint: Option<&str>,
        user_id: Option<&str>,
    ) -> String {
        let tag = language::resolve(language_hint, message);
        tracing::debug!(language = %tag, "Resolved response language");

        let history = match user_id {
            Some(id) => self.store.get(id).await,
            None => Vec::new(),
        };

        let turns = compose(message, &history, tag);

        match self.client.complete(&turns, &self.options).await {
            Ok(raw) => {
                let reply = formatter::format(&raw, tag);
                if let Some(id) = user_id {
                    self.store
                        .append(id, vec![Turn::user(message), Turn::assistant(raw)])
                        .await;
                }
                reply
            },
            Err(e) => {
                tracing::warn!(language = %tag, "Inference unavailable: {}", e);
                formatter::fallback_message(tag)
            },
        }
    }

    /// Ordered history for a user; empty for identifiers never seen.
    pub async fn history(&self, user_id: &str) -> Vec<Turn> {
        self.store.get(user_id).await
    }

    /// Drop a user's history. Idempotent.
    pub async fn clear_history(&self, user_id: &str) {
        self.store.clear(user_id).await;
    }
}
