//! Remote inference client
//!
//! Issues a single synchronous call to the hosted chat-completion endpoint.
//! At most one attempt per invocation; the only cancellation mechanism is
//! the request timeout. Callers convert every failure into a user-facing
//! fallback rather than propagating a raw transport error.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::config::InferenceConfig;
use crate::models::Turn;
use crate::services::llm::models::{CompletionOptions, CompletionRequest, CompletionResponse};

/// Why the remote model could not produce a reply.
#[derive(Error, Debug)]
pub enum LLMError {
    #[error("inference request timed out")]
    Timeout,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("inference endpoint returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed completion payload: {0}")]
    MalformedResponse(String),

    #[error("no inference API key configured")]
    MissingApiKey,
}

/// Interface for sending an assembled message list to a hosted model and
/// receiving the generated text. Implementors encapsulate transport and
/// vendor-specific API details; tests substitute a stub.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[Turn],
        options: &CompletionOptions,
    ) -> Result<String, LLMError>;
}

/// reqwest-backed client for an OpenRouter-compatible chat-completion API.
pub struct HttpInferenceClient {
    http_client: Client,
    api_base: String,
    api_key: String,
}

impl HttpInferenceClient {
    pub fn new(config: &InferenceConfig) -> Self {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn complete(
        &self,
        messages: &[Turn],
        options: &CompletionOptions,
    ) -> Result<String, LLMError> {
        if self.api_key.is_empty() {
            return Err(LLMError::MissingApiKey);
        }

        let body = CompletionRequest {
            model: &options.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        tracing::debug!(
            model = %options.model,
            messages = messages.len(),
            "Sending completion request"
        );

        let response = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .timeout(options.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LLMError::Timeout
                } else {
                    LLMError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Inference endpoint rejected request");
            return Err(LLMError::Api { status: status.as_u16(), body });
        }

        let payload: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LLMError::MalformedResponse(e.to_string()))?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LLMError::MalformedResponse("no choices in response".to_string()))?;

        if content.trim().is_empty() {
            return Err(LLMError::MalformedResponse("empty completion content".to_string()));
        }

        Ok(content)
    }
}
