//! Per-session event listener tables.
//!
//! One pub/sub mechanism serves every session: handlers are keyed by event
//! name, fan out in registration order, and `once` entries are removed
//! before invocation so they fire at most once even under re-entrant
//! registration or emission.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde_json::Value;

/// Callback invoked with the event's params (`Value::Null` when absent).
pub type EventHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Token returned by registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct HandlerEntry {
    id: ListenerId,
    callback: EventHandler,
    once: bool,
}

/// Listener table owned by one session.
pub(crate) struct EventListeners {
    next_id: AtomicU64,
    inner: Mutex<HashMap<String, Vec<HandlerEntry>>>,
}

impl EventListeners {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn add(&self, event: &str, callback: EventHandler, once: bool) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner
            .lock()
            .entry(event.to_string())
            .or_default()
            .push(HandlerEntry { id, callback, once });
        id
    }

    /// Remove one handler. Returns whether it was present.
    pub(crate) fn remove(&self, event: &str, id: ListenerId) -> bool {
        let mut map = self.inner.lock();
        let Some(entries) = map.get_mut(event) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            map.remove(event);
        }
        removed
    }

    pub(crate) fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Invoke all handlers for `event` in registration order. `once` entries
    /// are unregistered before their callback runs; callbacks execute outside
    /// the table lock so they may re-register or unregister freely.
    pub(crate) fn emit(&self, event: &str, params: &Value) -> usize {
        let snapshot: Vec<EventHandler> = {
            let mut map = self.inner.lock();
            match map.get_mut(event) {
                Some(entries) => {
                    let callbacks = entries.iter().map(|e| e.callback.clone()).collect();
                    entries.retain(|e| !e.once);
                    if entries.is_empty() {
                        map.remove(event);
                    }
                    callbacks
                }
                None => Vec::new(),
            }
        };

        for callback in &snapshot {
            callback(params);
        }
        snapshot.len()
    }

    #[cfg(test)]
    pub(crate) fn count(&self, event: &str) -> usize {
        self.inner.lock().get(event).map_or(0, Vec::len)
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
