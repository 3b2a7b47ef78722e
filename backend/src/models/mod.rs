pub mod chat;

pub use chat::{
    ChatRequest, ChatResponse, HealthResponse, HistoryQuery, HistoryResponse, Role, Turn,
};
