//! Webhook intake: shared-secret authentication, decoding, and handler
//! fan-out.

pub mod auth;
pub mod receiver;

pub use auth::{SecretValidator, SECRET_TOKEN_HEADER};
pub use receiver::{HandlerFailure, WebhookReceiver, WebhookRequest, WebhookResponse};
