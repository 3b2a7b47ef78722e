// Common test utilities and helpers

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::models::Turn;
use crate::services::llm::{CompletionOptions, InferenceClient, LLMError};
use crate::services::{ChatService, ConversationStore, InMemoryConversationStore};

/// Inference stub returning a canned reply; records every message list it
/// was called with so tests can assert on the composed prompt.
pub struct StubInferenceClient {
    reply: String,
    pub seen: Mutex<Vec<Vec<Turn>>>,
}

impl StubInferenceClient {
    pub fn new(reply: &str) -> Self {
        Self { reply: reply.to_string(), seen: Mutex::new(Vec::new()) }
    }

    pub fn last_messages(&self) -> Vec<Turn> {
        self.seen
            .lock()
            .expect("stub mutex poisoned")
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl InferenceClient for StubInferenceClient {
    async fn complete(
        &self,
        messages: &[Turn],
        _options: &CompletionOptions,
    ) -> Result<String, LLMError> {
        self.seen.lock().expect("stub mutex poisoned").push(messages.to_vec());
        Ok(self.reply.clone())
    }
}

/// Inference stub whose remote call always times out.
pub struct TimeoutInferenceClient;

#[async_trait]
impl InferenceClient for TimeoutInferenceClient {
    async fn complete(
        &self,
        _messages: &[Turn],
        _options: &CompletionOptions,
    ) -> Result<String, LLMError> {
        Err(LLMError::Timeout)
    }
}

/// Chat service over an in-memory store; the store handle is returned so
/// tests can inspect what was persisted.
pub fn create_chat_service(
    client: Arc<dyn InferenceClient>,
) -> (ChatService, Arc<InMemoryConversationStore>) {
    let store = Arc::new(InMemoryConversationStore::new());
    let service = ChatService::new(
        client,
        Arc::clone(&store) as Arc<dyn ConversationStore>,
        CompletionOptions::default(),
    );
    (service, store)
}
