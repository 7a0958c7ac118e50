//! Tests for message types and the sendMessage operation.

use super::*;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_message_deserializes_platform_payload() {
    let json = r#"{
        "message_id": 7,
        "from": { "id": 100, "first_name": "Ada", "username": "ada" },
        "chat": { "id": -100200, "type": "group" },
        "date": 1700000000,
        "text": "/nft xdc123 1"
    }"#;

    let message: Message = serde_json::from_str(json).unwrap();

    assert_eq!(message.message_id, 7);
    assert_eq!(message.chat.id, -100200);
    assert_eq!(message.chat.kind.as_deref(), Some("group"));
    assert_eq!(message.from.unwrap().username.as_deref(), Some("ada"));
    assert_eq!(message.text.as_deref(), Some("/nft xdc123 1"));
}

#[test]
fn test_message_tolerates_missing_optional_fields() {
    let json = r#"{ "message_id": 1, "chat": { "id": 5 } }"#;

    let message: Message = serde_json::from_str(json).unwrap();

    assert!(message.text.is_none());
    assert!(message.from.is_none());
    assert!(message.date.is_none());
}

#[test]
fn test_message_ignores_unknown_fields() {
    let json = r#"{
        "message_id": 1,
        "chat": { "id": 5 },
        "sticker": { "file_id": "abc" }
    }"#;

    let message: Message = serde_json::from_str(json).unwrap();
    assert_eq!(message.message_id, 1);
}

#[tokio::test]
async fn test_send_message_builds_encoded_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bott0ken/sendMessage"))
        .and(query_param("chat_id", "42"))
        .and(query_param("text", "two words"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BotApiClient::with_base_url(mock_server.uri(), "t0ken");

    client
        .send_message(42, "two words")
        .await
        .expect("mocked sendMessage should succeed");
}

#[tokio::test]
async fn test_send_message_surfaces_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bott0ken/sendMessage"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let client = BotApiClient::with_base_url(mock_server.uri(), "t0ken");

    let error = client.send_message(42, "hi").await.unwrap_err();
    assert_eq!(error.status(), Some(403));
}
