//! Webhook receiver: inbound request decoding and handler fan-out.
//!
//! The receiver coordinates the full intake pipeline for one callback:
//! authenticate, decode the update, partition populated events into
//! dispatchable and unhandled, run every dispatchable handler concurrently,
//! and aggregate the outcomes.
//!
//! # Fan-out barrier
//!
//! Dispatch runs as independent tasks with no ordering guarantee between
//! them. The receiver waits for every task to settle before producing a
//! response; it never short-circuits on the first failure. A failed handler
//! contributes one failure descriptor to the 500 response body while its
//! siblings run to completion.

use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::update::dispatch::{BotContext, HandlerRegistry};
use crate::update::{Update, UpdateEvent, UpdateKind};
use crate::webhook::auth::{SecretValidator, SECRET_TOKEN_HEADER};

// ============================================================================
// Webhook Request/Response Types
// ============================================================================

/// Raw HTTP webhook request data, transport-agnostic.
///
/// Header keys are matched case-insensitively for the designated secret
/// header; callers normalizing keys to lowercase get the fast path.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    headers: HashMap<String, String>,
    body: Bytes,
}

impl WebhookRequest {
    /// Create a new webhook request.
    ///
    /// # Arguments
    ///
    /// * `headers` - HTTP headers (lowercase keys recommended)
    /// * `body` - Raw payload bytes
    pub fn new(headers: HashMap<String, String>, body: Bytes) -> Self {
        Self { headers, body }
    }

    /// The presented secret token header value, if any.
    pub fn secret_token(&self) -> Option<&str> {
        self.headers
            .get(SECRET_TOKEN_HEADER)
            .or_else(|| self.headers.get("X-Telegram-Bot-Api-Secret-Token"))
            .map(|s| s.as_str())
    }

    /// The raw payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.body
    }
}

/// One failed handler invocation, as surfaced in the 500 response body.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerFailure {
    /// Event kind whose handler failed
    pub kind: String,

    /// Human-readable failure description
    pub message: String,
}

/// Outcome of processing one webhook request.
#[derive(Debug)]
pub enum WebhookResponse {
    /// 200 - every dispatchable handler settled successfully, or none matched
    Ok,

    /// 403 - secret token missing or mismatched; the body was not inspected
    Unauthorized,

    /// 400 - the body did not parse as an update
    MalformedPayload { message: String },

    /// 500 - one or more handlers failed; all of them ran to completion first
    HandlerFailures(Vec<HandlerFailure>),
}

impl WebhookResponse {
    /// Get the HTTP status code for this response.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Unauthorized => 403,
            Self::MalformedPayload { .. } => 400,
            Self::HandlerFailures(_) => 500,
        }
    }

    /// Check if the response indicates success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

// ============================================================================
// Webhook Receiver
// ============================================================================

/// Coordinates authentication, decoding, and concurrent dispatch for
/// incoming webhook callbacks.
pub struct WebhookReceiver {
    validator: SecretValidator,
    registry: Arc<HandlerRegistry>,
    ctx: Arc<BotContext>,
}

impl WebhookReceiver {
    /// Create a new webhook receiver.
    ///
    /// # Arguments
    ///
    /// * `validator` - Shared-secret gate applied before any processing
    /// * `registry` - Dispatch table, built once at startup
    /// * `ctx` - Read-only environment shared with every handler
    pub fn new(
        validator: SecretValidator,
        registry: Arc<HandlerRegistry>,
        ctx: Arc<BotContext>,
    ) -> Self {
        Self {
            validator,
            registry,
            ctx,
        }
    }

    /// Process one incoming webhook request.
    ///
    /// # Processing Steps
    ///
    /// 1. Authenticate the secret token; on failure respond 403 without
    ///    parsing or logging the body
    /// 2. Decode the body as an update; malformed bodies get a controlled
    ///    400 instead of an unhandled fault
    /// 3. Partition populated events into dispatchable and unhandled;
    ///    unhandled kinds are logged and dropped
    /// 4. Dispatch every dispatchable event concurrently and wait for all
    ///    of them to settle
    /// 5. Aggregate failures into a 500, or respond 200 when none occurred
    pub async fn receive(&self, request: WebhookRequest) -> WebhookResponse {
        // Fail closed before touching the body.
        if !self.validator.authenticate(request.secret_token()) {
            warn!("webhook rejected: secret token missing or mismatched");
            return WebhookResponse::Unauthorized;
        }

        let update: Update = match serde_json::from_slice(request.payload()) {
            Ok(update) => update,
            Err(e) => {
                warn!(error = %e, "webhook body is not a valid update");
                return WebhookResponse::MalformedPayload {
                    message: e.to_string(),
                };
            }
        };

        for key in update.unknown_keys() {
            warn!(kind = %key, "handler not found, dropping event");
        }

        let (dispatchable, unhandled): (Vec<UpdateEvent>, Vec<UpdateEvent>) = update
            .events()
            .into_iter()
            .partition(|event| self.registry.contains(event.kind()));

        for event in &unhandled {
            warn!(kind = %event.kind(), "handler not found, dropping event");
        }

        if dispatchable.is_empty() {
            debug!("no dispatchable events in update");
            return WebhookResponse::Ok;
        }

        let failures = self.fan_out(dispatchable).await;

        if failures.is_empty() {
            WebhookResponse::Ok
        } else {
            warn!(failed = failures.len(), "one or more handlers failed");
            WebhookResponse::HandlerFailures(failures)
        }
    }

    /// Run every dispatchable event as an independent task and wait for all
    /// of them to settle, collecting every failure.
    ///
    /// A task panic counts as that handler's failure rather than tearing
    /// down the request.
    async fn fan_out(&self, events: Vec<UpdateEvent>) -> Vec<HandlerFailure> {
        let mut tasks = JoinSet::new();
        let mut kinds: HashMap<tokio::task::Id, UpdateKind> = HashMap::new();

        for event in events {
            let registry = Arc::clone(&self.registry);
            let ctx = Arc::clone(&self.ctx);
            let kind = event.kind();

            let handle = tasks.spawn(async move { registry.dispatch(&event, &ctx).await });
            kinds.insert(handle.id(), kind);
        }

        info!(dispatched = kinds.len(), "dispatching update events");

        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, Ok(()))) => {}
                Ok((id, Err(e))) => failures.push(HandlerFailure {
                    kind: kind_label(&kinds, id),
                    message: e.to_string(),
                }),
                Err(join_error) => failures.push(HandlerFailure {
                    kind: kind_label(&kinds, join_error.id()),
                    message: "handler task panicked".to_string(),
                }),
            }
        }

        failures
    }
}

/// Wire name of the kind a task was spawned for.
fn kind_label(kinds: &HashMap<tokio::task::Id, UpdateKind>, id: tokio::task::Id) -> String {
    kinds
        .get(&id)
        .map(|kind| kind.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
#[path = "receiver_tests.rs"]
mod tests;
