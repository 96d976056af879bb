use super::*;
use serde_json::json;

fn recorder() -> (EventHandler, Arc<Mutex<Vec<Value>>>) {
    let seen: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let handler: EventHandler = Arc::new(move |params: &Value| {
        sink.lock().push(params.clone());
    });
    (handler, seen)
}

#[test]
fn test_fan_out_in_registration_order() {
    let listeners = EventListeners::new();
    let order: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));

    for tag in [1u32, 2, 3] {
        let order = order.clone();
        listeners.add(
            "Page.loadEventFired",
            Arc::new(move |_| order.lock().push(tag)),
            false,
        );
    }

    let delivered = listeners.emit("Page.loadEventFired", &json!({}));
    assert_eq!(delivered, 3);
    assert_eq!(*order.lock(), vec![1, 2, 3]);
}

#[test]
fn test_handler_receives_params() {
    let listeners = EventListeners::new();
    let (handler, seen) = recorder();
    listeners.add("Log.entryAdded", handler, false);

    listeners.emit("Log.entryAdded", &json!({"entry": {"level": "error"}}));
    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0]["entry"]["level"], "error");
}

#[test]
fn test_once_fires_exactly_once() {
    let listeners = EventListeners::new();
    let (handler, seen) = recorder();
    listeners.add("Page.loadEventFired", handler, true);

    listeners.emit("Page.loadEventFired", &json!({}));
    listeners.emit("Page.loadEventFired", &json!({}));
    assert_eq!(seen.lock().len(), 1);
    assert_eq!(listeners.count("Page.loadEventFired"), 0);
}

#[test]
fn test_once_removed_before_invocation_reentrant_emit() {
    // A once handler that synchronously re-emits the same event must not be
    // invoked a second time.
    let listeners = Arc::new(EventListeners::new());
    let calls = Arc::new(Mutex::new(0u32));
    {
        let listeners_inner = listeners.clone();
        let calls = calls.clone();
        listeners.add(
            "Database.addDatabase",
            Arc::new(move |_| {
                *calls.lock() += 1;
                listeners_inner.emit("Database.addDatabase", &json!({}));
            }),
            true,
        );
    }

    listeners.emit("Database.addDatabase", &json!({}));
    assert_eq!(*calls.lock(), 1);
}

#[test]
fn test_once_reregistering_new_handler() {
    // Re-registration from within a once handler takes effect for the next
    // emission, not the current one.
    let listeners = Arc::new(EventListeners::new());
    let calls = Arc::new(Mutex::new(Vec::new()));
    {
        let listeners_inner = listeners.clone();
        let calls_outer = calls.clone();
        listeners.add(
            "Page.loadEventFired",
            Arc::new(move |_| {
                calls_outer.lock().push("once");
                let calls_inner = calls_outer.clone();
                listeners_inner.add(
                    "Page.loadEventFired",
                    Arc::new(move |_| calls_inner.lock().push("replacement")),
                    false,
                );
            }),
            true,
        );
    }

    listeners.emit("Page.loadEventFired", &json!({}));
    assert_eq!(*calls.lock(), vec!["once"]);

    listeners.emit("Page.loadEventFired", &json!({}));
    assert_eq!(*calls.lock(), vec!["once", "replacement"]);
}

#[test]
fn test_remove_by_token() {
    let listeners = EventListeners::new();
    let (handler, seen) = recorder();
    let id = listeners.add("Page.loadEventFired", handler, false);

    assert!(listeners.remove("Page.loadEventFired", id));
    assert!(!listeners.remove("Page.loadEventFired", id));

    listeners.emit("Page.loadEventFired", &json!({}));
    assert!(seen.lock().is_empty());
}

#[test]
fn test_clear_drops_all_handlers() {
    let listeners = EventListeners::new();
    let (handler, seen) = recorder();
    listeners.add("a", handler.clone(), false);
    listeners.add("b", handler, false);

    listeners.clear();
    listeners.emit("a", &json!({}));
    listeners.emit("b", &json!({}));
    assert!(seen.lock().is_empty());
}

#[test]
fn test_emit_unlistened_event_is_noop() {
    let listeners = EventListeners::new();
    assert_eq!(listeners.emit("Nobody.cares", &json!({})), 0);
}
