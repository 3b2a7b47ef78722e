use std::sync::Arc;

use crate::models::Role;
use crate::services::formatter;
use crate::services::llm::InferenceClient;
use crate::services::history::ConversationStore;
use crate::services::language::LanguageTag;
use crate::tests::common::{StubInferenceClient, TimeoutInferenceClient, create_chat_service};

#[tokio::test]
async fn test_pidgin_end_to_end() {
    let client = Arc::new(StubInferenceClient::new("Try sleep early. Avoid phone before bed."));
    let (service, _) = create_chat_service(Arc::clone(&client) as Arc<dyn InferenceClient>);

    let reply = service
        .chat("How far, I no sleep well last night", None, Some("u1"))
        .await;

    // Formatted reply carries the pidgin template
    assert!(reply.contains("How far! See wetin I fit yarn you:"));
    assert!(reply.contains("Wetin Fit Dey Happen"));
    assert!(reply.contains("Try sleep early."));
    assert!(reply.contains("Wetin You Fit Do"));
    assert!(reply.contains("Avoid phone before bed."));
    assert!(reply.ends_with("You wan tell me anything else?"));

    // Composer embedded a pidgin-directed system prompt
    let messages = client.last_messages();
    assert_eq!(messages[0].role, Role::System);
    assert!(messages[0].content.contains("Pidgin English"));
    assert_eq!(messages.last().unwrap().role, Role::User);
}

#[tokio::test]
async fn test_message_list_invariant_with_history() {
    let client = Arc::new(StubInferenceClient::new("Drink water. Rest."));
    let (service, _) = create_chat_service(Arc::clone(&client) as Arc<dyn InferenceClient>);

    service.chat("I have a headache", None, Some("u1")).await;
    service.chat("It is getting worse", None, Some("u1")).await;

    // Second call: one system turn, the two stored turns, one new user turn
    let messages = client.last_messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "I have a headache");
    assert_eq!(messages[2].role, Role::Assistant);
    assert_eq!(messages[3].role, Role::User);
    assert_eq!(messages[3].content, "It is getting worse");
}

#[tokio::test]
async fn test_history_stores_raw_model_text() {
    let raw = "Drink water. Rest.";
    let client = Arc::new(StubInferenceClient::new(raw));
    let (service, store) = create_chat_service(client);

    service.chat("I have a headache", None, Some("u1")).await;

    let history = store.get("u1").await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, "I have a headache");
    // The assistant turn is the remote client's result, not the rendering
    assert_eq!(history[1].content, raw);
}

#[tokio::test]
async fn test_timeout_returns_language_aware_fallback() {
    let (service, store) = create_chat_service(Arc::new(TimeoutInferenceClient));

    let reply = service
        .chat("How far, I no sleep well last night", None, Some("u1"))
        .await;

    assert_eq!(reply, formatter::fallback_message(LanguageTag::Pidgin));
    // Failed exchanges leave no trace in history
    assert!(store.get("u1").await.is_empty());
}

#[tokio::test]
async fn test_language_hint_wins_over_detection() {
    let client = Arc::new(StubInferenceClient::new("Pumzika vizuri."));
    let (service, _) = create_chat_service(Arc::clone(&client) as Arc<dyn InferenceClient>);

    let reply = service
        .chat("How far, I no sleep well", Some("swahili"), None)
        .await;

    assert!(client.last_messages()[0].content.contains("Swahili"));
    assert!(reply.contains("Habari!"));
}

#[tokio::test]
async fn test_anonymous_chat_stores_nothing() {
    let client = Arc::new(StubInferenceClient::new("Rest well."));
    let (service, store) = create_chat_service(client);

    service.chat("hello there", None, None).await;

    // No user id was supplied, so nothing may be keyed anywhere
    assert!(store.get("").await.is_empty());
    assert!(service.history("anyone").await.is_empty());
}

#[tokio::test]
async fn test_history_unknown_user_is_empty() {
    let client = Arc::new(StubInferenceClient::new("Rest well."));
    let (service, _) = create_chat_service(client);

    assert!(service.history("never-seen").await.is_empty());
}

#[tokio::test]
async fn test_clear_history() {
    let client = Arc::new(StubInferenceClient::new("Rest well. Drink water."));
    let (service, _) = create_chat_service(client);

    service.chat("hello", None, Some("u1")).await;
    assert!(!service.history("u1").await.is_empty());

    service.clear_history("u1").await;
    assert!(service.history("u1").await.is_empty());
}
