//! Event handlers bound to the dispatch table.
//!
//! One handler per event kind: the sequence marker is acknowledged and
//! dropped, content messages go through command parsing. Replies are
//! delivered through the outbound client held by the shared context.

use async_trait::async_trait;
use telegram_bot_sdk::client::Message;
use telegram_bot_sdk::error::{ApiError, HandlerError};
use telegram_bot_sdk::update::dispatch::{BotContext, EventHandler};
use telegram_bot_sdk::update::UpdateEvent;
use tracing::debug;

use crate::commands::CommandRegistry;

/// Treat an outbound reply outcome under the default delivery policy.
///
/// A non-2xx from the API is already classified and logged by the client and
/// does not fail the update; a transport fault does.
pub(crate) fn deliver(result: Result<reqwest::Response, ApiError>) -> Result<(), HandlerError> {
    match result {
        Ok(_) => Ok(()),
        Err(ApiError::ErrorStatus { .. }) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// SequenceHandler
// ============================================================================

/// Handler for the `update_id` sequence marker.
///
/// The marker carries no actionable content; it is acknowledged so the kind
/// counts as handled instead of showing up as an unhandled-event diagnostic
/// on every callback.
pub struct SequenceHandler;

#[async_trait]
impl EventHandler for SequenceHandler {
    async fn handle(&self, event: &UpdateEvent, _ctx: &BotContext) -> Result<(), HandlerError> {
        if let UpdateEvent::SequenceId(update_id) = event {
            debug!(update_id, "sequence marker received");
        }
        Ok(())
    }
}

// ============================================================================
// MessageHandler
// ============================================================================

/// Handler for content messages.
///
/// Validates the command shape and hands the message to the command
/// registry. Shape violations are reported back to the chat rather than
/// failing the update.
pub struct MessageHandler {
    commands: CommandRegistry,
}

impl MessageHandler {
    /// Create a message handler over a command registry.
    pub fn new(commands: CommandRegistry) -> Self {
        Self { commands }
    }

    async fn handle_message(&self, message: &Message, ctx: &BotContext) -> Result<(), HandlerError> {
        let Some(text) = message.text.as_deref() else {
            return deliver(
                ctx.api
                    .send_message(message.chat.id, "How did you even do this?")
                    .await,
            );
        };

        let tokens: Vec<&str> = text.split_whitespace().collect();

        if let Some(problem) = self.first_violation(&tokens) {
            return deliver(
                ctx.api
                    .send_message(message.chat.id, &format!("⚠️ {problem}"))
                    .await,
            );
        }

        let name = tokens[0].get(1..).unwrap_or("");
        let args: Vec<String> = tokens[1..].iter().map(|s| s.to_string()).collect();

        self.commands.execute(name, message, &args, ctx).await
    }

    /// First violated command-shape rule, if any.
    ///
    /// Rules are checked in a fixed order and the first violation wins, so a
    /// message that breaks several rules produces a single reply.
    fn first_violation(&self, tokens: &[&str]) -> Option<&'static str> {
        let first = tokens.first().copied().unwrap_or("");
        let name = first.get(1..).unwrap_or("");

        if !self.commands.contains(name) {
            return Some("The specified command does not exist");
        }
        if !first.starts_with('/') {
            return Some("The command must start with /");
        }
        if tokens.len() < 2 {
            return Some("The command must have at least one argument");
        }
        None
    }
}

#[async_trait]
impl EventHandler for MessageHandler {
    async fn handle(&self, event: &UpdateEvent, ctx: &BotContext) -> Result<(), HandlerError> {
        match event {
            UpdateEvent::Message(message) => self.handle_message(message, ctx).await,
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
