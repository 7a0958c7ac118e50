//! Block-explorer lookup client.
//!
//! Answers token-existence queries against a BlocksScan-compatible API.
//! Existence is signalled purely by the response status: 2xx means the token
//! is known, anything else means it is not.

use telegram_bot_sdk::error::ApiError;
use tracing::debug;

/// Default explorer host for the XDC network.
pub const DEFAULT_EXPLORER_BASE_URL: &str = "https://xdc.blocksscan.io";

/// Client for token lookups against a block explorer.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    http: reqwest::Client,
    base_url: String,
}

impl ExplorerClient {
    /// Create a client against a specific explorer host.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Whether the given token ID exists under the contract address.
    ///
    /// Non-2xx responses mean the token does not exist; transport faults
    /// propagate as [`ApiError::Transport`].
    pub async fn token_exists(&self, address: &str, token_id: &str) -> Result<bool, ApiError> {
        let url = format!(
            "{}/api/tokens/{}/tokenID/{}",
            self.base_url, address, token_id
        );

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        debug!(url = %url, status = status.as_u16(), "token lookup completed");
        Ok(status.is_success())
    }
}

impl Default for ExplorerClient {
    fn default() -> Self {
        Self::new(DEFAULT_EXPLORER_BASE_URL)
    }
}

#[cfg(test)]
#[path = "explorer_tests.rs"]
mod tests;
