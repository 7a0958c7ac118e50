//! Outbound Telegram Bot API client.
//!
//! The Bot API embeds the bot token in the URL path
//! (`{base}/bot{token}/{method}`), so every rendered endpoint is itself a
//! secret. The client therefore redacts the token before any URL reaches a
//! log line.
//!
//! # Examples
//!
//! ```rust,no_run
//! use telegram_bot_sdk::client::BotApiClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BotApiClient::new("123456:bot-token");
//!
//! let params = [("chat_id", "42".to_string()), ("text", "hi".to_string())];
//! let url = client.method_url("sendMessage", Some(&params))?;
//! let response = client.invoke(url).await?;
//! # Ok(())
//! # }
//! ```

pub mod message;

pub use message::{Chat, Message, User};

use reqwest::Response;
use tracing::{error, info, warn};
use url::Url;

use crate::error::ApiError;

/// Default Bot API host.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Client for authenticated calls against the Telegram Bot API.
///
/// The client is cheap to clone; the underlying connection pool is shared
/// between clones.
#[derive(Clone)]
pub struct BotApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl BotApiClient {
    /// Create a client against the default Bot API host.
    ///
    /// # Arguments
    ///
    /// * `token` - The bot authentication token issued by the platform
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL, token)
    }

    /// Create a client against a non-default API host.
    ///
    /// Used for self-hosted Bot API deployments and for tests that point the
    /// client at a local mock server.
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Build the endpoint URL for an API method.
    ///
    /// Composes `{base}/bot{token}/{method}` and, when `params` is present
    /// and non-empty, appends a query string from the pairs in slice order.
    /// Identical inputs produce byte-identical URLs. Values receive standard
    /// URL-encoding and nothing else.
    ///
    /// # Arguments
    ///
    /// * `method` - Bot API method name, e.g. `sendMessage`
    /// * `params` - Optional ordered query parameters
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] when the configured base URL cannot
    /// be parsed as an absolute URL.
    pub fn method_url(
        &self,
        method: &str,
        params: Option<&[(&str, String)]>,
    ) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}/bot{}/{}", self.base_url, self.token, method))
            .map_err(|e| ApiError::InvalidUrl {
                message: e.to_string(),
            })?;

        if let Some(params) = params {
            if !params.is_empty() {
                let mut query = url.query_pairs_mut();
                for (key, value) in params {
                    query.append_pair(key, value);
                }
            }
        }

        Ok(url)
    }

    /// Perform a call against a previously built endpoint URL.
    ///
    /// Any non-2xx status is classified as [`ApiError::ErrorStatus`] carrying
    /// the numeric code; the response is returned raw on success. Both
    /// outcomes emit a diagnostic log line (with the token redacted), and
    /// logging never affects control flow. Transport-level faults surface as
    /// [`ApiError::Transport`] and are not retried.
    pub async fn invoke(&self, url: Url) -> Result<Response, ApiError> {
        let redacted_url = self.redacted(&url);

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(url = %redacted_url, error = %e, "API transport failure");
                return Err(ApiError::Transport(e));
            }
        };

        let status = response.status();
        if status.is_success() {
            info!(url = %redacted_url, "API call succeeded");
            Ok(response)
        } else {
            warn!(url = %redacted_url, status = status.as_u16(), "API call failed");
            Err(ApiError::ErrorStatus {
                status: status.as_u16(),
            })
        }
    }

    /// Render a URL with the token path segment replaced, for logging.
    fn redacted(&self, url: &Url) -> String {
        if self.token.is_empty() {
            return url.as_str().to_string();
        }
        url.as_str().replace(&self.token, "<REDACTED>")
    }
}

// Security: Don't expose the token in debug output
impl std::fmt::Debug for BotApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotApiClient")
            .field("base_url", &self.base_url)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
