//! In-process conversation history
//!
//! Ordered turns keyed by user identifier, used only to enrich the next
//! prompt. No durability across restarts, no eviction, no size cap; callers
//! own the rate of growth. Concurrent appends for the same identifier settle
//! last-writer-wins at the map entry.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::models::Turn;

/// Small injectable interface over the per-user turn lists: an in-memory map
/// here, an external cache/store in a larger deployment.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append turns for a user, creating the entry lazily.
    async fn append(&self, user_id: &str, turns: Vec<Turn>);

    /// Ordered turns for a user; empty if the identifier was never seen.
    async fn get(&self, user_id: &str) -> Vec<Turn>;

    /// Remove a user's history. A no-op for unknown identifiers.
    async fn clear(&self, user_id: &str);
}

#[derive(Default)]
pub struct InMemoryConversationStore {
    conversations: DashMap<String, Vec<Turn>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append(&self, user_id: &str, turns: Vec<Turn>) {
        self.conversations
            .entry(user_id.to_string())
            .or_default()
            .extend(turns);
    }

    async fn get(&self, user_id: &str) -> Vec<Turn> {
        self.conversations
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    async fn clear(&self, user_id: &str) {
        self.conversations.remove(user_id);
    }
}
