//! Session registry: the root connection plus attached flat sessions.
//!
//! The root is a real registry entry keyed by `None`, so dispatch never
//! special-cases it. A detached entry is removed and never reused; a later
//! attach for the same target creates a fresh entry.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::error::CdpError;
use crate::events::EventListeners;

/// Locally-synthesized event delivered to a session's own listeners when it
/// is detached or the connection tears down.
pub const DISCONNECTED_EVENT: &str = "disconnected";

/// One attached session (or the root connection).
impl std::fmt::Debug for SessionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEntry")
            .field("session_id", &self.session_id)
            .field("target_id", &self.target_id)
            .field("parent_session_id", &self.parent_session_id)
            .field("attached", &self.is_attached())
            .finish()
    }
}

pub(crate) struct SessionEntry {
    /// `None` for the root session.
    pub session_id: Option<String>,
    /// Target the session is attached to; `None` for the root.
    pub target_id: Option<String>,
    /// Session that received the attach notification; `None` when attached
    /// from the root.
    pub parent_session_id: Option<String>,
    pub listeners: EventListeners,
    attached: AtomicBool,
}

impl SessionEntry {
    fn new(
        session_id: Option<String>,
        target_id: Option<String>,
        parent_session_id: Option<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            target_id,
            parent_session_id,
            listeners: EventListeners::new(),
            attached: AtomicBool::new(true),
        })
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// Terminal: notify lifecycle listeners, then drop them all.
    fn mark_detached(&self) {
        self.attached.store(false, Ordering::SeqCst);
        self.listeners.emit(DISCONNECTED_EVENT, &Value::Null);
        self.listeners.clear();
    }
}

/// Owns the sessionId -> session mapping for one connection.
pub(crate) struct SessionRegistry {
    /// Present for the life of the connection, even after teardown empties
    /// the routing map.
    root: Arc<SessionEntry>,
    sessions: Mutex<HashMap<Option<String>, Arc<SessionEntry>>>,
}

impl SessionRegistry {
    /// Create the registry with its implicit root session.
    pub(crate) fn new() -> Self {
        let root = SessionEntry::new(None, None, None);
        let mut sessions = HashMap::new();
        sessions.insert(None, root.clone());
        Self {
            root,
            sessions: Mutex::new(sessions),
        }
    }

    pub(crate) fn root(&self) -> Arc<SessionEntry> {
        self.root.clone()
    }

    /// Register a newly attached session.
    pub(crate) fn attach(
        &self,
        session_id: String,
        target_id: Option<String>,
        parent_session_id: Option<String>,
    ) -> Result<Arc<SessionEntry>, CdpError> {
        let mut sessions = self.sessions.lock();
        let key = Some(session_id.clone());
        if sessions.contains_key(&key) {
            return Err(CdpError::AlreadyAttached(session_id));
        }
        let entry = SessionEntry::new(Some(session_id.clone()), target_id, parent_session_id);
        sessions.insert(key, entry.clone());
        debug!("session attached: {session_id}");
        Ok(entry)
    }

    /// Remove a session: mark it detached, notify and clear its listeners,
    /// drop it from the registry.
    pub(crate) fn detach(&self, session_id: &str) -> Result<(), CdpError> {
        let entry = self
            .sessions
            .lock()
            .remove(&Some(session_id.to_string()))
            .ok_or_else(|| CdpError::NotAttached(session_id.to_string()))?;
        entry.mark_detached();
        debug!("session detached: {session_id}");
        Ok(())
    }

    /// Resolve the session a message is scoped to (`None` = root).
    pub(crate) fn get(&self, session_id: Option<&str>) -> Option<Arc<SessionEntry>> {
        self.sessions
            .lock()
            .get(&session_id.map(str::to_string))
            .cloned()
    }

    /// Teardown: detach every session, the root included.
    pub(crate) fn detach_all(&self) {
        let drained: Vec<Arc<SessionEntry>> = {
            let mut sessions = self.sessions.lock();
            sessions.drain().map(|(_, entry)| entry).collect()
        };
        for entry in drained {
            entry.mark_detached();
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.sessions.lock().len()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
