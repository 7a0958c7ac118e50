//! Shared-secret authentication for inbound webhook callbacks.
//!
//! The platform echoes a pre-agreed secret token in a designated header on
//! every callback. Validation is an exact byte-for-byte match performed in
//! constant time, since this gate guards all downstream processing.

use subtle::ConstantTimeEq;

/// Header carrying the shared secret on every platform callback.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Placeholder compared when the header is absent, so the comparison path is
/// the same whether or not the caller sent a token.
const MISSING_TOKEN: &str = "[NONE]";

/// Validates the webhook secret token header.
///
/// # Security
///
/// - Uses constant-time comparison to prevent timing attacks
/// - Never logs the secret or presented token values
/// - An empty configured secret fails closed (every request rejected)
///
/// # Examples
///
/// ```rust
/// use telegram_bot_sdk::webhook::SecretValidator;
///
/// let validator = SecretValidator::new("webhook-secret");
/// assert!(validator.authenticate(Some("webhook-secret")));
/// assert!(!validator.authenticate(Some("wrong")));
/// assert!(!validator.authenticate(None));
/// ```
pub struct SecretValidator {
    secret: String,
}

impl SecretValidator {
    /// Create a validator around the configured inbound secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Validate a presented secret token against the configured secret.
    ///
    /// Returns `true` only on an exact match. On `false` the caller must
    /// respond 403 and perform no further processing of the payload.
    pub fn authenticate(&self, presented: Option<&str>) -> bool {
        if self.secret.is_empty() {
            return false;
        }

        let presented = presented.unwrap_or(MISSING_TOKEN).as_bytes();
        let expected = self.secret.as_bytes();

        // Length is not secret; only the contents are compared in constant time.
        if presented.len() != expected.len() {
            return false;
        }

        presented.ct_eq(expected).into()
    }
}

// Security: Don't expose the secret in debug output
impl std::fmt::Debug for SecretValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretValidator")
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
