//! Remote model plumbing
//!
//! Everything between a detected language and raw model text: the system
//! prompt / message assembly, the chat-completion wire types, and the
//! single-attempt HTTP client behind the [`InferenceClient`] seam.

mod client;
mod models;
mod prompt;

pub use client::{HttpInferenceClient, InferenceClient, LLMError};
pub use models::{Choice, ChoiceMessage, CompletionOptions, CompletionRequest, CompletionResponse};
pub use prompt::{MAX_SECTIONS, compose};
