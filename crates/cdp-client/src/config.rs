//! Connection configuration.

use std::time::Duration;

use serde::Deserialize;

/// Options for establishing a connection.
///
/// The timeout applies only to endpoint discovery and the WebSocket
/// handshake. In-flight commands are never timed out by the core; callers
/// wanting per-command deadlines compose their own above this layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    /// HTTP debugging endpoint, e.g. `http://127.0.0.1:9222`.
    pub endpoint: String,
    /// Discovery and handshake timeout, in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:9222".to_string(),
            connect_timeout_ms: 10_000,
        }
    }
}

impl ConnectOptions {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ConnectOptions::default();
        assert_eq!(opts.endpoint, "http://127.0.0.1:9222");
        assert_eq!(opts.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_deserialize_partial() {
        let opts: ConnectOptions =
            serde_json::from_str(r#"{"endpoint": "http://10.0.0.5:9222"}"#).unwrap();
        assert_eq!(opts.endpoint, "http://10.0.0.5:9222");
        assert_eq!(opts.connect_timeout_ms, 10_000);
    }
}
