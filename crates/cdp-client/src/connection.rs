//! Connection facade and inbound dispatch.
//!
//! One `Connection` owns one transport, one correlator, and one session
//! registry. The receive loop processes inbound frames strictly in arrival
//! order; outbound commands may be issued concurrently from any task.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use cdp_protocol::decode::Decoded;
use cdp_protocol::domains::{self, methods};
use cdp_protocol::envelope::{CdpResponse, MessageKind};
use cdp_protocol::types::{AttachedToTargetParams, DetachedFromTargetParams};

use crate::config::ConnectOptions;
use crate::correlator::{CommandFuture, Correlator};
use crate::discover;
use crate::error::CdpError;
use crate::events::ListenerId;
use crate::registry::{SessionEntry, SessionRegistry};
use crate::transport::{self, TransportSink, TransportStream};

/// Connection lifecycle. `send` is only valid in `Open`; both explicit
/// disposal and transport-initiated close end in `Closed`, which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closing,
    Closed,
}

struct ConnectionInner {
    state: Mutex<ConnectionState>,
    correlator: Correlator,
    registry: SessionRegistry,
    sink: Arc<dyn TransportSink>,
}

/// A connection to a browser's DevTools endpoint.
///
/// Dropping the connection aborts the receive loop; pending commands then
/// resolve with [`CdpError::ConnectionClosed`].
pub struct Connection {
    inner: Arc<ConnectionInner>,
    recv_task: JoinHandle<()>,
}

impl Connection {
    /// Connect via the HTTP debugging endpoint (e.g. `http://localhost:9222`).
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        Self::connect_with(ConnectOptions::new(endpoint)).await
    }

    /// Connect with explicit options.
    pub async fn connect_with(options: ConnectOptions) -> Result<Self, CdpError> {
        let timeout = options.connect_timeout();
        let version = discover::browser_version(&options.endpoint, timeout).await?;
        Self::connect_ws_with_timeout(&version.web_socket_debugger_url, timeout).await
    }

    /// Connect directly to a known WebSocket debugger URL.
    pub async fn connect_ws(ws_url: &str) -> Result<Self, CdpError> {
        Self::connect_ws_with_timeout(ws_url, ConnectOptions::default().connect_timeout()).await
    }

    async fn connect_ws_with_timeout(ws_url: &str, timeout: Duration) -> Result<Self, CdpError> {
        let (sink, stream) = tokio::time::timeout(timeout, transport::connect_ws(ws_url))
            .await
            .map_err(|_| {
                CdpError::ConnectionFailed(format!("timed out connecting to {ws_url}"))
            })??;
        Ok(Self::from_transport(sink, stream))
    }

    /// Build a connection over an already-established transport.
    pub fn from_transport(
        sink: impl TransportSink + 'static,
        stream: impl TransportStream + 'static,
    ) -> Self {
        let inner = Arc::new(ConnectionInner {
            state: Mutex::new(ConnectionState::Connecting),
            correlator: Correlator::new(),
            registry: SessionRegistry::new(),
            sink: Arc::new(sink),
        });
        // Open before the receive loop starts, so a transport that dies
        // immediately tears down from Open rather than racing this write.
        *inner.state.lock() = ConnectionState::Open;
        let recv_task = tokio::spawn(receive_loop(Box::new(stream), inner.clone()));
        debug!("connection open");
        Self { inner, recv_task }
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.lock()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Issue a command and return its correlated future without awaiting the
    /// reply. `params` must be a JSON object; the facade does not validate
    /// domain-specific shapes.
    pub async fn issue(
        &self,
        method: &str,
        params: Value,
        session_id: Option<&str>,
    ) -> CommandFuture {
        issue_on(&self.inner, method, params, session_id.map(str::to_string)).await
    }

    /// Issue a command and await its result.
    pub async fn send(
        &self,
        method: &str,
        params: Value,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        self.issue(method, params, session_id).await.await
    }

    /// Schema-checked send on the root session.
    pub async fn invoke(
        &self,
        method: &str,
        args: &[(&str, Option<Value>)],
    ) -> Result<Value, CdpError> {
        self.root().invoke(method, args).await
    }

    /// Register a handler for `event` on the root session.
    pub fn on<F>(&self, event: &str, handler: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.root().on(event, handler)
    }

    /// Register a handler invoked at most once.
    pub fn once<F>(&self, event: &str, handler: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.root().once(event, handler)
    }

    /// Unregister a root-session handler.
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        self.root().off(event, id)
    }

    /// The root session facade.
    pub fn root(&self) -> SessionHandle {
        SessionHandle {
            inner: self.inner.clone(),
            entry: self.inner.registry.root(),
        }
    }

    /// Facade for an attached session.
    pub fn session(&self, session_id: &str) -> Result<SessionHandle, CdpError> {
        self.inner
            .registry
            .get(Some(session_id))
            .map(|entry| SessionHandle {
                inner: self.inner.clone(),
                entry,
            })
            .ok_or_else(|| CdpError::UnknownSession(session_id.to_string()))
    }

    /// Attach to a target with flat session routing and return the session
    /// facade.
    pub async fn attach_to_target(&self, target_id: &str) -> Result<SessionHandle, CdpError> {
        let result = self
            .invoke(
                methods::ATTACH_TO_TARGET,
                &[
                    ("targetId", Some(json!(target_id))),
                    ("flatten", Some(json!(true))),
                ],
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("missing sessionId".to_string()))?;

        // The attachedToTarget notification normally lands before this reply
        // and registers the session; register here only if it has not.
        let entry = match self.inner.registry.get(Some(session_id)) {
            Some(entry) => entry,
            None => self.inner.registry.attach(
                session_id.to_string(),
                Some(target_id.to_string()),
                None,
            )?,
        };
        Ok(SessionHandle {
            inner: self.inner.clone(),
            entry,
        })
    }

    /// Create a new target and return its id.
    pub async fn create_target(&self, url: &str) -> Result<String, CdpError> {
        let result = self
            .invoke(methods::CREATE_TARGET, &[("url", Some(json!(url)))])
            .await?;
        result["targetId"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CdpError::InvalidResponse("missing targetId".to_string()))
    }

    /// Close a target.
    pub async fn close_target(&self, target_id: &str) -> Result<(), CdpError> {
        self.invoke(methods::CLOSE_TARGET, &[("targetId", Some(json!(target_id)))])
            .await?;
        Ok(())
    }

    /// Tear the connection down: fail all outstanding commands, detach every
    /// session, close the transport. Idempotent; `send` afterwards fails with
    /// [`CdpError::ConnectionClosed`] without touching the transport.
    pub async fn dispose(&self) {
        teardown(&self.inner);
        self.inner.sink.close().await;
        self.recv_task.abort();
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}

/// Facade bound to one session (root or attached). Cloneable and cheap; all
/// clones share the same listener table and correlator.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<ConnectionInner>,
    entry: Arc<SessionEntry>,
}

impl SessionHandle {
    /// `None` for the root session.
    pub fn session_id(&self) -> Option<&str> {
        self.entry.session_id.as_deref()
    }

    pub fn target_id(&self) -> Option<&str> {
        self.entry.target_id.as_deref()
    }

    pub fn parent_session_id(&self) -> Option<&str> {
        self.entry.parent_session_id.as_deref()
    }

    pub fn is_attached(&self) -> bool {
        self.entry.is_attached()
    }

    /// Issue a command scoped to this session, returning its correlated
    /// future without awaiting the reply.
    pub async fn issue(&self, method: &str, params: Value) -> CommandFuture {
        if !self.entry.is_attached() {
            return CommandFuture::failed(match &self.entry.session_id {
                Some(id) => CdpError::NotAttached(id.clone()),
                None => CdpError::ConnectionClosed,
            });
        }
        issue_on(&self.inner, method, params, self.entry.session_id.clone()).await
    }

    /// Issue a command scoped to this session and await its result.
    pub async fn send(&self, method: &str, params: Value) -> Result<Value, CdpError> {
        self.issue(method, params).await.await
    }

    /// Schema-checked send: the method must exist in the domain table, and
    /// params are assembled from `(name, value)` pairs with absent optionals
    /// dropped.
    pub async fn invoke(
        &self,
        method: &str,
        args: &[(&str, Option<Value>)],
    ) -> Result<Value, CdpError> {
        let spec = domains::command(method).ok_or_else(|| {
            CdpError::Schema(cdp_protocol::SchemaError::UnknownMethod(method.to_string()))
        })?;
        let params = spec.build_params(args)?;
        self.send(method, Value::Object(params)).await
    }

    pub fn on<F>(&self, event: &str, handler: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.entry.listeners.add(event, Arc::new(handler), false)
    }

    pub fn once<F>(&self, event: &str, handler: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.entry.listeners.add(event, Arc::new(handler), true)
    }

    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        self.entry.listeners.remove(event, id)
    }

    /// Detach this session from its target. The root session cannot be
    /// detached.
    pub async fn detach(&self) -> Result<(), CdpError> {
        let Some(session_id) = self.entry.session_id.clone() else {
            return Err(CdpError::InvalidRequest(
                "cannot detach the root session".to_string(),
            ));
        };

        let spec = domains::command(methods::DETACH_FROM_TARGET).ok_or_else(|| {
            CdpError::Schema(cdp_protocol::SchemaError::UnknownMethod(
                methods::DETACH_FROM_TARGET.to_string(),
            ))
        })?;
        let params = spec.build_params(&[("sessionId", Some(json!(session_id)))])?;
        issue_on(
            &self.inner,
            methods::DETACH_FROM_TARGET,
            Value::Object(params),
            None,
        )
        .await
        .await?;

        // The peer's detachedFromTarget notification usually wins the race
        // and removes the session first; NotAttached here is expected.
        let _ = self.inner.registry.detach(&session_id);
        Ok(())
    }
}

async fn issue_on(
    inner: &ConnectionInner,
    method: &str,
    params: Value,
    session_id: Option<String>,
) -> CommandFuture {
    if method.is_empty() {
        return CommandFuture::failed(CdpError::InvalidRequest("empty method name".to_string()));
    }
    if *inner.state.lock() != ConnectionState::Open {
        return CommandFuture::failed(CdpError::ConnectionClosed);
    }
    inner
        .correlator
        .issue(inner.sink.as_ref(), method, params, session_id)
        .await
}

async fn receive_loop(mut stream: Box<dyn TransportStream>, inner: Arc<ConnectionInner>) {
    loop {
        match stream.next().await {
            Some(Ok(text)) => dispatch(&inner, &text),
            Some(Err(e)) => {
                error!("transport failed: {e}");
                break;
            }
            None => {
                debug!("transport closed");
                break;
            }
        }
    }
    teardown(&inner);
}

/// Classify one inbound frame and route it.
fn dispatch(inner: &ConnectionInner, text: &str) {
    trace!("cdp recv: {text}");
    let message: CdpResponse = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            warn!("dropping frame: {}", CdpError::MalformedMessage(e.to_string()));
            return;
        }
    };

    match message.kind() {
        MessageKind::Reply => dispatch_reply(inner, message),
        MessageKind::Event => dispatch_event(inner, message),
        MessageKind::Malformed => warn!(
            "dropping frame: {}",
            CdpError::MalformedMessage("neither id nor method present".to_string())
        ),
    }
}

fn dispatch_reply(inner: &ConnectionInner, message: CdpResponse) {
    let Some(id) = message.id else { return };
    match message.error {
        Some(err) => inner.correlator.reject(
            id,
            CdpError::Protocol {
                code: err.code,
                message: err.message,
            },
        ),
        None => inner
            .correlator
            .resolve(id, message.result.unwrap_or(Value::Null)),
    }
}

fn dispatch_event(inner: &ConnectionInner, message: CdpResponse) {
    let Some(method) = message.method else { return };
    let params = message.params.unwrap_or(Value::Null);
    let scope = message.session_id;

    // Register the new session before fan-out, so a handler that reacts to
    // the attach can immediately observe messages for it.
    if method == methods::ATTACHED_TO_TARGET {
        match Decoded::<AttachedToTargetParams>::from_value(params.clone()) {
            Decoded::Typed(attach) => {
                if let Err(e) = inner.registry.attach(
                    attach.session_id,
                    Some(attach.target_info.target_id),
                    scope.clone(),
                ) {
                    warn!("attach from notification failed: {e}");
                }
            }
            Decoded::Raw { error, .. } => {
                warn!("undecodable {} params: {error}", methods::ATTACHED_TO_TARGET);
            }
        }
    }

    let Some(session) = inner.registry.get(scope.as_deref()) else {
        let sid = scope.unwrap_or_default();
        warn!(
            "dropping {method}: {}",
            CdpError::UnknownSession(sid)
        );
        return;
    };
    if !domains::is_known_event(&method) {
        trace!("event {method} not present in the schema table");
    }
    let delivered = session.listeners.emit(&method, &params);
    trace!("event {method} delivered to {delivered} handler(s)");

    // Remove the session only after fan-out, so listeners still registered on
    // its parent observe the detach event itself.
    if method == methods::DETACHED_FROM_TARGET {
        match Decoded::<DetachedFromTargetParams>::from_value(params) {
            Decoded::Typed(detach) => {
                if let Err(e) = inner.registry.detach(&detach.session_id) {
                    warn!("detach from notification failed: {e}");
                }
            }
            Decoded::Raw { error, .. } => {
                warn!(
                    "undecodable {} params: {error}",
                    methods::DETACHED_FROM_TARGET
                );
            }
        }
    }
}

/// Terminal transition. The first caller wins; every later call is a no-op.
fn teardown(inner: &ConnectionInner) {
    {
        let mut state = inner.state.lock();
        if matches!(*state, ConnectionState::Closing | ConnectionState::Closed) {
            return;
        }
        *state = ConnectionState::Closing;
    }
    inner.correlator.fail_all();
    inner.registry.detach_all();
    *inner.state.lock() = ConnectionState::Closed;
    debug!("connection closed");
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
