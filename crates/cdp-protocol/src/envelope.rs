//! CDP message envelopes.
//!
//! Every frame on the debugging WebSocket is one of three shapes: an outbound
//! command (`id` + `method`), an inbound reply (`id` + `result` or `error`),
//! or an inbound notification (`method`, no `id`). Replies and notifications
//! share [`CdpResponse`]; [`CdpResponse::kind`] tells them apart.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound command message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

impl CdpRequest {
    /// Build a command envelope. `params` and `session_id` are omitted from
    /// the serialized frame when `None`.
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            id,
            method: method.into(),
            params,
            session_id: None,
        }
    }

    /// Scope the command to an attached session.
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Inbound message: a command reply or an event notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdpResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CdpErrorResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Error object embedded in a failed command reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdpErrorResponse {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Classification of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Carries an `id`: resolves exactly one pending command.
    Reply,
    /// Carries a `method` and no `id`: an unsolicited notification.
    Event,
    /// Neither `id` nor `method`: not a valid CDP frame.
    Malformed,
}

impl CdpResponse {
    /// Classify this message. Messages bearing an `id` are replies even if a
    /// `method` field is also present.
    pub fn kind(&self) -> MessageKind {
        if self.id.is_some() {
            MessageKind::Reply
        } else if self.method.is_some() {
            MessageKind::Event
        } else {
            MessageKind::Malformed
        }
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
