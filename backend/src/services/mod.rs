pub mod chat_service;
pub mod formatter;
pub mod history;
pub mod language;
pub mod llm;

pub use chat_service::ChatService;
pub use history::{ConversationStore, InMemoryConversationStore};
pub use language::LanguageTag;
