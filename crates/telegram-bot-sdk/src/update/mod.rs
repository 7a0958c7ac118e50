//! Inbound update model.
//!
//! An update is one event notification from the platform, structurally a
//! mapping from event-kind key to an event-specific payload. This module
//! models the kinds this gateway understands as a closed union, so dispatch
//! is a total function with an explicit default arm instead of runtime key
//! probing.

pub mod dispatch;

pub use dispatch::{BotContext, EventHandler, HandlerRegistry};

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::client::Message;

// ============================================================================
// UpdateKind
// ============================================================================

/// The event kinds with registered meaning in this gateway.
///
/// Each variant corresponds to one key of the inbound update mapping; the
/// wire name is returned by [`UpdateKind::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    /// Monotonic sequence marker (`update_id`)
    SequenceId,

    /// Content message (`message`)
    Message,
}

impl UpdateKind {
    /// Wire name of this kind, as it appears as an update key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SequenceId => "update_id",
            Self::Message => "message",
        }
    }
}

impl std::fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Update
// ============================================================================

/// One inbound event notification.
///
/// A typical update carries the `update_id` sequence marker plus at most one
/// content key; all other keys are absent. Keys outside the closed union are
/// collected in `extra` so the receiver can log them as unhandled instead of
/// failing the request. Immutable once parsed; lifetime is a single request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Update {
    /// Sequence marker assigned by the platform
    #[serde(default)]
    pub update_id: Option<i64>,

    /// New incoming message
    #[serde(default)]
    pub message: Option<Message>,

    /// Populated keys without a registered kind
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Update {
    /// Enumerate the populated (kind, payload) pairs in declaration order.
    ///
    /// An update with zero populated keys yields an empty set; that is a
    /// valid update and not an error.
    pub fn events(&self) -> Vec<UpdateEvent> {
        let mut events = Vec::new();
        if let Some(update_id) = self.update_id {
            events.push(UpdateEvent::SequenceId(update_id));
        }
        if let Some(message) = &self.message {
            events.push(UpdateEvent::Message(message.clone()));
        }
        events
    }

    /// Keys present in the update that map to no known kind.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.extra.keys().map(String::as_str)
    }

    /// Whether no known kind is populated.
    pub fn is_empty(&self) -> bool {
        self.update_id.is_none() && self.message.is_none()
    }
}

// ============================================================================
// UpdateEvent
// ============================================================================

/// Tagged union over the populated event payloads of an update.
#[derive(Debug, Clone)]
pub enum UpdateEvent {
    /// Sequence marker payload
    SequenceId(i64),

    /// Content message payload
    Message(Message),
}

impl UpdateEvent {
    /// The kind this payload belongs to.
    pub fn kind(&self) -> UpdateKind {
        match self {
            Self::SequenceId(_) => UpdateKind::SequenceId,
            Self::Message(_) => UpdateKind::Message,
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
