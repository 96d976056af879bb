//! Message correlation: one unique id per outbound command, one resolution
//! per caller.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::Instant;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use cdp_protocol::envelope::CdpRequest;

use crate::error::CdpError;
use crate::transport::TransportSink;

/// Command awaiting its reply.
struct PendingCommand {
    method: String,
    tx: oneshot::Sender<Result<Value, CdpError>>,
    created_at: Instant,
}

/// Future resolving to a command's result.
///
/// Dropping it cancels the command for the caller only; a late reply is then
/// ignored under the unknown-id rule.
pub struct CommandFuture {
    rx: oneshot::Receiver<Result<Value, CdpError>>,
}

impl CommandFuture {
    fn new() -> (oneshot::Sender<Result<Value, CdpError>>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    /// A future that is already rejected.
    pub(crate) fn failed(error: CdpError) -> Self {
        let (tx, fut) = Self::new();
        let _ = tx.send(Err(error));
        fut
    }
}

impl Future for CommandFuture {
    type Output = Result<Value, CdpError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|res| match res {
            Ok(result) => result,
            Err(_) => Err(CdpError::ConnectionClosed),
        })
    }
}

/// Assigns request ids and routes replies back to the issuing caller.
pub(crate) struct Correlator {
    /// Next request id. Ids start at 1 and are never reused within a
    /// connection's lifetime.
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, PendingCommand>>,
    /// Set once by `fail_all`; later issues are rejected instead of parked.
    closed: AtomicBool,
}

impl Correlator {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Allocate an id, register the pending slot, and hand the serialized
    /// envelope to the transport. The returned future is rejected in place if
    /// the send fails synchronously.
    pub(crate) async fn issue(
        &self,
        sink: &dyn TransportSink,
        method: &str,
        params: Value,
        session_id: Option<String>,
    ) -> CommandFuture {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, fut) = CommandFuture::new();
        self.pending.lock().insert(
            id,
            PendingCommand {
                method: method.to_string(),
                tx,
                created_at: Instant::now(),
            },
        );

        if self.closed.load(Ordering::SeqCst) {
            // Raced with teardown; the slot must still resolve exactly once.
            self.reject(id, CdpError::ConnectionClosed);
            return fut;
        }

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params: Some(params),
            session_id,
        };
        match serde_json::to_string(&request) {
            Ok(frame) => {
                trace!("cdp send: {frame}");
                if let Err(e) = sink.send(frame).await {
                    self.reject(id, e);
                }
            }
            Err(e) => self.reject(id, CdpError::Serialization(e)),
        }

        fut
    }

    /// Fulfill the pending command for `id`. Unknown ids are ignored: they
    /// are duplicate or late replies, or replies to a command whose caller
    /// dropped the future.
    pub(crate) fn resolve(&self, id: u64, result: Value) {
        match self.pending.lock().remove(&id) {
            Some(cmd) => {
                let _ = cmd.tx.send(Ok(result));
            }
            None => warn!("reply for unknown command id {id} ignored"),
        }
    }

    /// Fail the pending command for `id`. Unknown ids are ignored.
    pub(crate) fn reject(&self, id: u64, error: CdpError) {
        match self.pending.lock().remove(&id) {
            Some(cmd) => {
                trace!("command {} ({}) rejected: {error}", id, cmd.method);
                let _ = cmd.tx.send(Err(error));
            }
            None => warn!("error reply for unknown command id {id} ignored"),
        }
    }

    /// Reject every outstanding command with a connection-closed error.
    /// Called once during teardown.
    pub(crate) fn fail_all(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let drained: Vec<(u64, PendingCommand)> = self.pending.lock().drain().collect();
        if !drained.is_empty() {
            debug!("failing {} outstanding command(s) on teardown", drained.len());
        }
        for (id, cmd) in drained {
            trace!(
                "command {} ({}) canceled after {:?}",
                id,
                cmd.method,
                cmd.created_at.elapsed()
            );
            let _ = cmd.tx.send(Err(CdpError::ConnectionClosed));
        }
    }

    #[cfg(test)]
    pub(crate) fn outstanding(&self) -> usize {
        self.pending.lock().len()
    }
}

#[cfg(test)]
#[path = "correlator_tests.rs"]
mod tests;
