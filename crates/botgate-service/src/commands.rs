//! Bot command registry and built-in commands.
//!
//! Commands are reachable as `/{name} args...` inside content messages. The
//! registry is built once at startup; like the event dispatch table, a miss
//! is an explicit logged no-op rather than an error.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use telegram_bot_sdk::client::Message;
use telegram_bot_sdk::error::HandlerError;
use telegram_bot_sdk::update::dispatch::BotContext;
use tracing::warn;

use crate::explorer::ExplorerClient;
use crate::handlers::deliver;

// ============================================================================
// Command trait and registry
// ============================================================================

/// A chat command bound to one name.
#[async_trait]
pub trait Command: Send + Sync {
    /// Execute the command for a message.
    ///
    /// `args` holds the whitespace-separated tokens after the command name;
    /// the message handler guarantees at least one.
    async fn execute(
        &self,
        message: &Message,
        args: &[String],
        ctx: &BotContext,
    ) -> Result<(), HandlerError>;
}

/// Registry mapping command names to implementations.
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a command under a name.
    ///
    /// If the name is already taken the command is replaced. Returns
    /// `&mut Self` to allow method chaining.
    pub fn register(&mut self, name: impl Into<String>, command: Arc<dyn Command>) -> &mut Self {
        self.commands.insert(name.into(), command);
        self
    }

    /// Check whether a command name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Execute the named command, or log and complete when it is absent.
    pub async fn execute(
        &self,
        name: &str,
        message: &Message,
        args: &[String],
        ctx: &BotContext,
    ) -> Result<(), HandlerError> {
        match self.commands.get(name) {
            Some(command) => command.execute(message, args, ctx).await,
            None => {
                warn!(command = name, "command not found, dropping message");
                Ok(())
            }
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// NftCommand
// ============================================================================

/// `/nft <address> <id>` checks that an XDC NFT exists.
///
/// Argument rules are evaluated in a fixed order and the first violation is
/// reported back to the chat. The explorer lookup always runs alongside the
/// cheap checks, so a garbage address still costs one lookup; that keeps the
/// rule set uniform instead of special-casing the network check.
pub struct NftCommand {
    explorer: ExplorerClient,
}

impl NftCommand {
    /// Create the command over an explorer client.
    pub fn new(explorer: ExplorerClient) -> Self {
        Self { explorer }
    }

    /// First violated argument rule, if any.
    async fn first_violation(&self, args: &[String]) -> Result<Option<&'static str>, HandlerError> {
        let address = args.first().map(String::as_str).unwrap_or("");
        let token_id = args.get(1).map(String::as_str).unwrap_or("");

        let mut violations = Vec::new();

        if address.len() != 43 {
            violations.push("Address must be 43 chars!");
        }
        if !address.starts_with("xdc") {
            violations.push("Address must start with `xdc`");
        }
        if !token_id.parse::<u64>().map(|id| id > 0).unwrap_or(false) {
            violations.push("ID must be a positive number!");
        }
        if !self.explorer.token_exists(address, token_id).await? {
            violations.push("Token does not exist!");
        }

        Ok(violations.first().copied())
    }
}

#[async_trait]
impl Command for NftCommand {
    async fn execute(
        &self,
        message: &Message,
        args: &[String],
        ctx: &BotContext,
    ) -> Result<(), HandlerError> {
        if let Some(problem) = self.first_violation(args).await? {
            return deliver(
                ctx.api
                    .send_message(message.chat.id, &format!("⚠️ {problem}"))
                    .await,
            );
        }

        deliver(ctx.api.send_message(message.chat.id, "Not implemented").await)
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
