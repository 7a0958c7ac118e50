//! Tests for the webhook receiver pipeline.

use super::*;
use crate::client::BotApiClient;
use crate::error::HandlerError;
use crate::update::dispatch::EventHandler;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test doubles
// ============================================================================

/// Handler that records every invocation and the payload it saw.
struct SpyHandler {
    calls: AtomicUsize,
    last_event: Mutex<Option<UpdateEvent>>,
}

impl SpyHandler {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_event: Mutex::new(None),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_event(&self) -> Option<UpdateEvent> {
        self.last_event.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventHandler for SpyHandler {
    async fn handle(&self, event: &UpdateEvent, _ctx: &BotContext) -> Result<(), HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_event.lock().unwrap() = Some(event.clone());
        Ok(())
    }
}

/// Handler that always fails with a fixed message.
struct FailingHandler;

#[async_trait]
impl EventHandler for FailingHandler {
    async fn handle(&self, _event: &UpdateEvent, _ctx: &BotContext) -> Result<(), HandlerError> {
        Err(HandlerError::failed("database unavailable"))
    }
}

/// Handler that replies to the chat through the outbound client.
struct ReplyHandler;

#[async_trait]
impl EventHandler for ReplyHandler {
    async fn handle(&self, event: &UpdateEvent, ctx: &BotContext) -> Result<(), HandlerError> {
        if let UpdateEvent::Message(message) = event {
            ctx.api.send_message(message.chat.id, "ack").await?;
        }
        Ok(())
    }
}

const SECRET: &str = "s3cret";

fn receiver_with(registry: HandlerRegistry, ctx: BotContext) -> WebhookReceiver {
    WebhookReceiver::new(
        SecretValidator::new(SECRET),
        Arc::new(registry),
        Arc::new(ctx),
    )
}

fn offline_context() -> BotContext {
    BotContext::new(BotApiClient::with_base_url("http://localhost:9", "t0ken"))
}

fn authed_request(body: &str) -> WebhookRequest {
    let headers = HashMap::from([(SECRET_TOKEN_HEADER.to_string(), SECRET.to_string())]);
    WebhookRequest::new(headers, Bytes::copy_from_slice(body.as_bytes()))
}

// ============================================================================
// Authentication gate
// ============================================================================

#[tokio::test]
async fn test_missing_secret_header_is_unauthorized() {
    let spy = Arc::new(SpyHandler::new());
    let mut registry = HandlerRegistry::new();
    registry.register(UpdateKind::Message, spy.clone());
    let receiver = receiver_with(registry, offline_context());

    let request = WebhookRequest::new(
        HashMap::new(),
        Bytes::from_static(br#"{"update_id":1,"message":{"message_id":1,"chat":{"id":2}}}"#),
    );

    let response = receiver.receive(request).await;

    assert_eq!(response.status_code(), 403);
    assert_eq!(spy.call_count(), 0, "no handler may run before auth passes");
}

#[tokio::test]
async fn test_mismatched_secret_header_is_unauthorized() {
    let spy = Arc::new(SpyHandler::new());
    let mut registry = HandlerRegistry::new();
    registry.register(UpdateKind::Message, spy.clone());
    let receiver = receiver_with(registry, offline_context());

    let headers = HashMap::from([(SECRET_TOKEN_HEADER.to_string(), "wrong".to_string())]);
    let request = WebhookRequest::new(headers, Bytes::from_static(b"{}"));

    let response = receiver.receive(request).await;

    assert!(matches!(response, WebhookResponse::Unauthorized));
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn test_canonical_case_header_is_accepted() {
    let receiver = receiver_with(HandlerRegistry::new(), offline_context());

    let headers = HashMap::from([(
        "X-Telegram-Bot-Api-Secret-Token".to_string(),
        SECRET.to_string(),
    )]);
    let request = WebhookRequest::new(headers, Bytes::from_static(b"{}"));

    assert!(receiver.receive(request).await.is_success());
}

// ============================================================================
// Decoding
// ============================================================================

#[tokio::test]
async fn test_malformed_body_is_a_controlled_400() {
    let spy = Arc::new(SpyHandler::new());
    let mut registry = HandlerRegistry::new();
    registry.register(UpdateKind::Message, spy.clone());
    let receiver = receiver_with(registry, offline_context());

    let response = receiver.receive(authed_request("this is not json")).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn test_empty_update_is_ok_with_zero_dispatches() {
    let spy = Arc::new(SpyHandler::new());
    let mut registry = HandlerRegistry::new();
    registry.register(UpdateKind::Message, spy.clone());
    let receiver = receiver_with(registry, offline_context());

    let response = receiver.receive(authed_request("{}")).await;

    assert!(response.is_success());
    assert_eq!(spy.call_count(), 0);
}

// ============================================================================
// Partitioning
// ============================================================================

#[tokio::test]
async fn test_unregistered_kind_is_dropped_without_failing() {
    // Only the message kind has a handler; the sequence marker is unhandled.
    let spy = Arc::new(SpyHandler::new());
    let mut registry = HandlerRegistry::new();
    registry.register(UpdateKind::Message, spy.clone());
    let receiver = receiver_with(registry, offline_context());

    let response = receiver.receive(authed_request(r#"{"update_id":77}"#)).await;

    assert!(response.is_success());
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_update_key_is_dropped_without_failing() {
    let receiver = receiver_with(HandlerRegistry::new(), offline_context());

    let response = receiver
        .receive(authed_request(
            r#"{"edited_message":{"message_id":1,"chat":{"id":2}}}"#,
        ))
        .await;

    assert!(response.is_success());
}

// ============================================================================
// Dispatch and fan-out
// ============================================================================

#[tokio::test]
async fn test_message_handler_invoked_once_with_payload() {
    let spy = Arc::new(SpyHandler::new());
    let mut registry = HandlerRegistry::new();
    registry.register(UpdateKind::Message, spy.clone());
    let receiver = receiver_with(registry, offline_context());

    let body = r#"{"message":{"message_id":5,"chat":{"id":42},"text":"hello"}}"#;
    let response = receiver.receive(authed_request(body)).await;

    assert!(response.is_success());
    assert_eq!(spy.call_count(), 1);

    match spy.last_event() {
        Some(UpdateEvent::Message(message)) => {
            assert_eq!(message.chat.id, 42);
            assert_eq!(message.text.as_deref(), Some("hello"));
        }
        other => panic!("expected message payload, got {other:?}"),
    }
}

#[tokio::test]
async fn test_partial_failure_yields_500_with_one_descriptor() {
    // Sequence handler fails, message handler succeeds and still produces
    // its outbound side effect.
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bott0ken/sendMessage"))
        .and(query_param("chat_id", "42"))
        .and(query_param("text", "ack"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut registry = HandlerRegistry::new();
    registry.register(UpdateKind::SequenceId, Arc::new(FailingHandler));
    registry.register(UpdateKind::Message, Arc::new(ReplyHandler));

    let ctx = BotContext::new(BotApiClient::with_base_url(mock_server.uri(), "t0ken"));
    let receiver = receiver_with(registry, ctx);

    let body = r#"{"update_id":9,"message":{"message_id":1,"chat":{"id":42},"text":"hi"}}"#;
    let response = receiver.receive(authed_request(body)).await;

    assert_eq!(response.status_code(), 500);
    match response {
        WebhookResponse::HandlerFailures(failures) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].kind, "update_id");
            assert!(failures[0].message.contains("database unavailable"));
        }
        other => panic!("expected handler failures, got {other:?}"),
    }
}

#[tokio::test]
async fn test_all_handlers_failing_lists_every_descriptor() {
    let mut registry = HandlerRegistry::new();
    registry.register(UpdateKind::SequenceId, Arc::new(FailingHandler));
    registry.register(UpdateKind::Message, Arc::new(FailingHandler));
    let receiver = receiver_with(registry, offline_context());

    let body = r#"{"update_id":9,"message":{"message_id":1,"chat":{"id":42}}}"#;
    let response = receiver.receive(authed_request(body)).await;

    match response {
        WebhookResponse::HandlerFailures(failures) => {
            assert_eq!(failures.len(), 2);
            let mut kinds: Vec<&str> = failures.iter().map(|f| f.kind.as_str()).collect();
            kinds.sort_unstable();
            assert_eq!(kinds, vec!["message", "update_id"]);
        }
        other => panic!("expected handler failures, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failure_descriptors_serialize_as_json_array() {
    let failures = vec![HandlerFailure {
        kind: "message".to_string(),
        message: "boom".to_string(),
    }];

    let rendered = serde_json::to_string(&failures).unwrap();
    assert_eq!(rendered, r#"[{"kind":"message","message":"boom"}]"#);
}
