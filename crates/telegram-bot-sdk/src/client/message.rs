//! Message types and message-sending operations for the Bot API.

use serde::{Deserialize, Serialize};

use crate::client::BotApiClient;
use crate::error::ApiError;

/// A chat the bot participates in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    /// Unique chat identifier
    pub id: i64,

    /// Chat type ("private", "group", "supergroup", "channel")
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// A user or bot account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: i64,

    /// User's first name
    #[serde(default)]
    pub first_name: Option<String>,

    /// User's handle, without the leading `@`
    #[serde(default)]
    pub username: Option<String>,
}

/// A message received from the platform.
///
/// Only the fields this gateway acts on are modeled; the platform sends many
/// more, which serde ignores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier within the chat
    pub message_id: i64,

    /// Chat the message belongs to
    pub chat: Chat,

    /// Sender, absent for channel posts
    #[serde(default)]
    pub from: Option<User>,

    /// Unix timestamp the message was sent at
    #[serde(default)]
    pub date: Option<i64>,

    /// Text content, absent for media-only messages
    #[serde(default)]
    pub text: Option<String>,
}

impl BotApiClient {
    /// Send a text message via the `sendMessage` method.
    ///
    /// # Arguments
    ///
    /// * `chat_id` - Target chat identifier
    /// * `text` - Message text
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ErrorStatus`] for non-2xx responses and
    /// [`ApiError::Transport`] for network-level failures.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let params = [
            ("chat_id", chat_id.to_string()),
            ("text", text.to_string()),
        ];
        let url = self.method_url("sendMessage", Some(&params))?;
        self.invoke(url).await
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
