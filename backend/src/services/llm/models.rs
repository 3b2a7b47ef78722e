//! Chat-completion wire types and call parameters

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::Turn;

/// Bounded parameters for a single completion call.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: "google/gemini-2.0-flash-exp:free".to_string(),
            temperature: 0.7,
            max_tokens: 512,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Outbound request body for `POST {api_base}/chat/completions`.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Turn],
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Success body: a list of choices, each holding a message with the
/// generated content. Parsed leniently; structural checks happen in the
/// client.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: String,
}
