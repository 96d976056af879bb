//! Transport seam and the WebSocket transport.
//!
//! The connection core owns a sink half (shared with every command issuer)
//! and a stream half (owned exclusively by the receive loop), so outbound
//! sends never contend with inbound processing.

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::error::CdpError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Outbound half of a transport.
#[async_trait]
pub trait TransportSink: Send + Sync {
    /// Deliver one UTF-8 text frame to the peer.
    async fn send(&self, frame: String) -> Result<(), CdpError>;

    /// Close the channel. Idempotent.
    async fn close(&self);
}

/// Inbound half of a transport.
#[async_trait]
pub trait TransportStream: Send {
    /// Next inbound text frame. `None` means the channel closed; an error is
    /// a terminal transport failure.
    async fn next(&mut self) -> Option<Result<String, CdpError>>;
}

/// Outbound half of a WebSocket connection.
pub struct WsSink {
    sink: tokio::sync::Mutex<SplitSink<WsStream, Message>>,
}

/// Inbound half of a WebSocket connection.
pub struct WsSource {
    stream: SplitStream<WsStream>,
}

/// Open a WebSocket and split it into transport halves.
pub async fn connect_ws(url: &str) -> Result<(WsSink, WsSource), CdpError> {
    let (ws_stream, _) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {e}")))?;
    debug!("WebSocket connected to {url}");

    let (sink, stream) = ws_stream.split();
    Ok((
        WsSink {
            sink: tokio::sync::Mutex::new(sink),
        },
        WsSource { stream },
    ))
}

#[async_trait]
impl TransportSink for WsSink {
    async fn send(&self, frame: String) -> Result<(), CdpError> {
        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(frame.into())).await?;
        Ok(())
    }

    async fn close(&self) {
        let mut sink = self.sink.lock().await;
        let _ = sink.close().await;
    }
}

#[async_trait]
impl TransportStream for WsSource {
    async fn next(&mut self) -> Option<Result<String, CdpError>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text.to_string())),
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed by peer");
                    return None;
                }
                // Ping/pong are answered by tungstenite; binary frames are
                // not part of the protocol.
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
