//! CDP client errors.

use thiserror::Error;

/// Errors surfaced by the connection core.
///
/// Failures tied to one command (`Protocol`, schema violations) affect only
/// that command's caller. Failures tied to the transport (`Transport`,
/// `ConnectionClosed`) fail every outstanding command and leave the
/// connection permanently unusable.
#[derive(Debug, Error)]
pub enum CdpError {
    /// Failed to establish the WebSocket connection.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Browser not reachable at the debugging endpoint.
    #[error("browser not available at {0}. Start it with --remote-debugging-port=9222")]
    BrowserNotAvailable(String),

    /// Underlying channel failed to send or closed unexpectedly.
    #[error("transport error: {0}")]
    Transport(String),

    /// The peer replied with an error object for a specific command.
    #[error("protocol error: {message} (code {code})")]
    Protocol { code: i64, message: String },

    /// Command issued after disposal, or the connection tore down while the
    /// command was in flight.
    #[error("connection closed")]
    ConnectionClosed,

    /// Unparsable inbound frame. Logged and dropped; the connection stays up.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// A sessionId the registry has never attached.
    #[error("unknown session: {0}")]
    UnknownSession(String),

    /// Attach for a sessionId that is already present.
    #[error("session already attached: {0}")]
    AlreadyAttached(String),

    /// Operation on a session that is not attached.
    #[error("session not attached: {0}")]
    NotAttached(String),

    /// Facade-level constraint violation (e.g. empty method name).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A reply that is missing a field the caller depends on.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Command rejected by the schema table before reaching the wire.
    #[error(transparent)]
    Schema(#[from] cdp_protocol::SchemaError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (endpoint discovery).
    #[error("http error: {0}")]
    Http(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::Transport(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::ConnectionFailed(format!("invalid URL: {e}"))
    }
}
