//! Tests for endpoint construction and call classification.

use super::*;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Endpoint construction
// ============================================================================

#[test]
fn test_method_url_embeds_token_and_method() {
    let client = BotApiClient::new("123456:abc");
    let url = client.method_url("getMe", None).unwrap();

    assert_eq!(url.as_str(), "https://api.telegram.org/bot123456:abc/getMe");
}

#[test]
fn test_method_url_without_params_has_no_query_string() {
    let client = BotApiClient::new("t0ken");
    let url = client.method_url("getMe", None).unwrap();

    assert_eq!(url.query(), None);
}

#[test]
fn test_method_url_empty_params_has_no_query_string() {
    let client = BotApiClient::new("t0ken");
    let url = client.method_url("getMe", Some(&[])).unwrap();

    assert_eq!(url.query(), None);
}

#[test]
fn test_method_url_appends_params_in_order() {
    let client = BotApiClient::new("t0ken");
    let params = [
        ("chat_id", "42".to_string()),
        ("text", "hello".to_string()),
    ];
    let url = client.method_url("sendMessage", Some(&params)).unwrap();

    assert_eq!(
        url.as_str(),
        "https://api.telegram.org/bott0ken/sendMessage?chat_id=42&text=hello"
    );
}

#[test]
fn test_method_url_encodes_values() {
    let client = BotApiClient::new("t0ken");
    let params = [("text", "a&b =c".to_string())];
    let url = client.method_url("sendMessage", Some(&params)).unwrap();

    assert_eq!(url.query(), Some("text=a%26b+%3Dc"));
}

#[test]
fn test_method_url_is_deterministic() {
    let client = BotApiClient::new("t0ken");
    let params = [
        ("chat_id", "42".to_string()),
        ("text", "same input".to_string()),
    ];

    let first = client.method_url("sendMessage", Some(&params)).unwrap();
    let second = client.method_url("sendMessage", Some(&params)).unwrap();

    assert_eq!(first.as_str(), second.as_str());
}

#[test]
fn test_with_base_url_trims_trailing_slash() {
    let client = BotApiClient::with_base_url("http://localhost:8081/", "t0ken");
    let url = client.method_url("getMe", None).unwrap();

    assert_eq!(url.as_str(), "http://localhost:8081/bott0ken/getMe");
}

#[test]
fn test_debug_redacts_token() {
    let client = BotApiClient::new("super-secret-token");
    let rendered = format!("{:?}", client);

    assert!(!rendered.contains("super-secret-token"));
    assert!(rendered.contains("<REDACTED>"));
}

// ============================================================================
// Call classification
// ============================================================================

#[tokio::test]
async fn test_invoke_success_returns_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bott0ken/getMe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": { "id": 1, "is_bot": true }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BotApiClient::with_base_url(mock_server.uri(), "t0ken");
    let url = client.method_url("getMe", None).unwrap();

    let response = client.invoke(url).await.expect("2xx should succeed");
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_invoke_classifies_non_2xx_as_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bott0ken/getMe"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = BotApiClient::with_base_url(mock_server.uri(), "t0ken");
    let url = client.method_url("getMe", None).unwrap();

    let error = client.invoke(url).await.unwrap_err();
    match error {
        ApiError::ErrorStatus { status } => assert_eq!(status, 404),
        other => panic!("expected ErrorStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invoke_passes_query_params_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bott0ken/sendMessage"))
        .and(query_param("chat_id", "42"))
        .and(query_param("text", "hello"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BotApiClient::with_base_url(mock_server.uri(), "t0ken");
    let params = [
        ("chat_id", "42".to_string()),
        ("text", "hello".to_string()),
    ];
    let url = client.method_url("sendMessage", Some(&params)).unwrap();

    client.invoke(url).await.expect("mocked call should succeed");
}
