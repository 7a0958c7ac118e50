//! # Telegram Bot SDK
//!
//! Software Development Kit for building Telegram bot webhook services:
//! outbound Bot API calls, typed update decoding, and per-event dispatch.
//!
//! This SDK provides:
//! - An outbound API client with deterministic endpoint construction
//! - A closed update model over the event kinds the bot understands
//! - A dispatch table mapping event kinds to handler implementations
//! - Webhook intake with shared-secret authentication and concurrent
//!   handler fan-out
//!
//! # Examples
//!
//! ## Sending a message
//!
//! ```rust,no_run
//! use telegram_bot_sdk::client::BotApiClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BotApiClient::new("123456:bot-token");
//! client.send_message(42, "hello").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Receiving webhooks
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use telegram_bot_sdk::client::BotApiClient;
//! use telegram_bot_sdk::update::dispatch::{BotContext, HandlerRegistry};
//! use telegram_bot_sdk::webhook::{SecretValidator, WebhookReceiver};
//!
//! let registry = HandlerRegistry::new();
//! let ctx = BotContext::new(BotApiClient::new("123456:bot-token"));
//! let receiver = WebhookReceiver::new(
//!     SecretValidator::new("webhook-secret"),
//!     Arc::new(registry),
//!     Arc::new(ctx),
//! );
//! ```

// Public modules
pub mod client;
pub mod error;
pub mod update;
pub mod webhook;

// Re-export commonly used types at crate root for convenience
pub use error::{ApiError, HandlerError};

pub use client::{BotApiClient, Chat, Message, User};
pub use update::{Update, UpdateEvent, UpdateKind};
pub use webhook::{
    HandlerFailure, SecretValidator, WebhookReceiver, WebhookRequest, WebhookResponse,
};
