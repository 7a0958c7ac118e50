//! Error types for Telegram Bot SDK operations.
//!
//! This module defines all error types used throughout the SDK, with
//! classification helpers that distinguish transient transport conditions
//! from permanent protocol-level rejections.

use thiserror::Error;

/// Errors during outbound Bot API operations.
///
/// These errors represent failures when communicating with the Bot API or a
/// compatible remote collaborator. A non-2xx response is classified here and
/// never escapes as a panic; a true transport fault surfaces as
/// [`ApiError::Transport`] and is fatal for the attempt (no retry is
/// performed by the client).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The remote API answered with a non-2xx status code.
    #[error("API returned error status: {status}")]
    ErrorStatus { status: u16 },

    /// Network, DNS, or TLS failure before a status code was produced.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Failed to parse a JSON response from the API.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// An endpoint URL could not be composed.
    #[error("Invalid endpoint URL: {message}")]
    InvalidUrl { message: String },
}

impl ApiError {
    /// Check if this error represents a transient condition that may succeed
    /// if the caller chooses to issue the call again.
    ///
    /// Transient conditions include:
    /// - Server errors (5xx)
    /// - Rate limiting (429)
    /// - Network/transport errors
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ErrorStatus { status } => *status >= 500 || *status == 429,
            Self::Transport(_) => true,
            Self::Json(_) => false,
            Self::InvalidUrl { .. } => false,
        }
    }

    /// The HTTP status carried by this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ErrorStatus { status } => Some(*status),
            _ => None,
        }
    }
}

/// Failure raised by an event handler during dispatch.
///
/// Handler failures are collected by the webhook fan-out barrier and
/// surfaced to the client as itemized failure descriptors; they never abort
/// sibling handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// An outbound API call the handler depends on failed.
    #[error("outbound API call failed: {0}")]
    Api(#[from] ApiError),

    /// Handler-specific failure.
    #[error("{message}")]
    Failed { message: String },
}

impl HandlerError {
    /// Construct a handler-specific failure from a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
