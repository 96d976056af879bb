//! # CDP Client
//!
//! Connection core for the Chrome DevTools Protocol: one [`Connection`] owns
//! the WebSocket transport, correlates command replies by request id,
//! dispatches event notifications to per-session listener tables, and tracks
//! the tree of attached flat sessions.
//!
//! ## Usage
//!
//! 1. Start a browser with remote debugging:
//!    ```bash
//!    chrome --remote-debugging-port=9222
//!    ```
//!
//! 2. Connect and drive it:
//!    ```rust,ignore
//!    let conn = Connection::connect("http://localhost:9222").await?;
//!    let target_id = conn.create_target("https://example.com").await?;
//!    let session = conn.attach_to_target(&target_id).await?;
//!    session.invoke("Page.enable", &[]).await?;
//!    session.on("Page.loadEventFired", |params| {
//!        println!("loaded: {params}");
//!    });
//!    ```
//!
//! Commands never time out inside the core: a command future resolves on
//! reply, on a protocol error, or when the connection tears down. Callers
//! wanting deadlines wrap the returned future themselves.

mod config;
mod connection;
mod correlator;
mod discover;
mod error;
mod events;
mod registry;
mod transport;

pub use cdp_protocol as protocol;

pub use config::ConnectOptions;
pub use connection::{Connection, ConnectionState, SessionHandle};
pub use correlator::CommandFuture;
pub use discover::{browser_version, list_pages, new_page};
pub use error::CdpError;
pub use events::ListenerId;
pub use registry::DISCONNECTED_EVENT;
pub use transport::{connect_ws, TransportSink, TransportStream, WsSink, WsSource};
