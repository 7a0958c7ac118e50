//! Event dispatch table mapping update kinds to handler implementations.
//!
//! The registry is built once at service startup and used read-only during
//! request handling. A dispatch for an unregistered kind is a logged no-op;
//! a registered handler's failure surfaces to the caller untouched.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use super::{UpdateEvent, UpdateKind};
use crate::client::BotApiClient;
use crate::error::HandlerError;

// ============================================================================
// BotContext
// ============================================================================

/// Read-only environment record shared by all handlers within a request.
///
/// Fully populated at process start and never mutated afterwards, so it can
/// be shared across concurrently running handlers without locking.
#[derive(Debug, Clone)]
pub struct BotContext {
    /// Outbound API client, carrying the bot token
    pub api: BotApiClient,
}

impl BotContext {
    /// Create a new context around an API client.
    pub fn new(api: BotApiClient) -> Self {
        Self { api }
    }
}

// ============================================================================
// EventHandler
// ============================================================================

/// The unit of logic bound to one event kind.
///
/// Handlers receive the event payload and the shared [`BotContext`], and run
/// concurrently with sibling handlers for the same update. They must be
/// `Send + Sync`.
///
/// # Error Handling
///
/// A returned error is collected by the fan-out barrier and surfaced as one
/// entry in the request's failure list; it never aborts sibling handlers.
///
/// # Examples
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use telegram_bot_sdk::error::HandlerError;
/// use telegram_bot_sdk::update::dispatch::{BotContext, EventHandler};
/// use telegram_bot_sdk::update::UpdateEvent;
///
/// struct EchoHandler;
///
/// #[async_trait]
/// impl EventHandler for EchoHandler {
///     async fn handle(&self, event: &UpdateEvent, ctx: &BotContext) -> Result<(), HandlerError> {
///         if let UpdateEvent::Message(message) = event {
///             if let Some(text) = message.text.as_deref() {
///                 ctx.api.send_message(message.chat.id, text).await?;
///             }
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle one event payload.
    async fn handle(&self, event: &UpdateEvent, ctx: &BotContext) -> Result<(), HandlerError>;
}

// ============================================================================
// HandlerRegistry
// ============================================================================

/// Registry mapping event kinds to their handlers.
///
/// Built once at service startup and used read-only during request handling.
/// Handlers are stored as `Arc<dyn EventHandler>` so they can be shared
/// across concurrently spawned dispatch tasks.
pub struct HandlerRegistry {
    handlers: HashMap<UpdateKind, Arc<dyn EventHandler>>,
}

impl HandlerRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for an event kind.
    ///
    /// If the kind already has a handler it is replaced. Returns `&mut Self`
    /// to allow method chaining.
    pub fn register(&mut self, kind: UpdateKind, handler: Arc<dyn EventHandler>) -> &mut Self {
        self.handlers.insert(kind, handler);
        self
    }

    /// Look up the handler for a kind.
    ///
    /// Returns `None` if the kind is not registered.
    pub fn resolve(&self, kind: UpdateKind) -> Option<Arc<dyn EventHandler>> {
        self.handlers.get(&kind).cloned()
    }

    /// Check whether a kind has a registered handler.
    pub fn contains(&self, kind: UpdateKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Dispatch an event to its registered handler and await completion.
    ///
    /// A missing handler is the explicit default arm: a diagnostic log line
    /// and a successful no-op. A present handler's failure is returned to
    /// the caller, never suppressed here.
    pub async fn dispatch(
        &self,
        event: &UpdateEvent,
        ctx: &BotContext,
    ) -> Result<(), HandlerError> {
        match self.resolve(event.kind()) {
            Some(handler) => handler.handle(event, ctx).await,
            None => {
                warn!(kind = %event.kind(), "handler not found, dropping event");
                Ok(())
            }
        }
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
