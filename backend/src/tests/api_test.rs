use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use crate::config::Config;
use crate::tests::common::{StubInferenceClient, create_chat_service};
use crate::{AppState, build_router};

fn test_app() -> Router {
    let client = Arc::new(StubInferenceClient::new("Rest well. Drink water."));
    let (service, _) = create_chat_service(client);
    let state = Arc::new(AppState::new(Config::default(), service));
    build_router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

#[tokio::test]
async fn test_history_for_unknown_user_is_empty_list() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/companion/history?user_id=ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["history"], serde_json::json!([]));
}

#[tokio::test]
async fn test_clear_history_returns_no_content() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/companion/history?user_id=ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/companion/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"message": ""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], 4001);
}

#[tokio::test]
async fn test_chat_round_trip() {
    let app = test_app();

    let payload = serde_json::json!({
        "message": "I no sleep well, how far",
        "user_id": "u1",
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/companion/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let reply = json["response"].as_str().expect("response is a string");
    assert!(reply.contains("NexaHealth Companion"));
    assert!(reply.contains("Rest well."));
}
