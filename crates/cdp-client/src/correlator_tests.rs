use super::*;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Records outbound frames; optionally fails every send.
struct RecordingSink {
    frames: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            frames: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    fn frames(&self) -> Vec<String> {
        self.frames.lock().clone()
    }
}

#[async_trait]
impl TransportSink for RecordingSink {
    async fn send(&self, frame: String) -> Result<(), CdpError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CdpError::Transport("send failed".to_string()));
        }
        self.frames.lock().push(frame);
        Ok(())
    }

    async fn close(&self) {}
}

#[tokio::test]
async fn test_ids_start_at_one_and_increment() {
    let correlator = Correlator::new();
    let sink = RecordingSink::new();

    let _f1 = correlator.issue(&sink, "Page.enable", json!({}), None).await;
    let _f2 = correlator.issue(&sink, "DOM.enable", json!({}), None).await;

    let frames = sink.frames();
    let first: Value = serde_json::from_str(&frames[0]).unwrap();
    let second: Value = serde_json::from_str(&frames[1]).unwrap();
    assert_eq!(first["id"], 1);
    assert_eq!(second["id"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_issues_get_unique_ids() {
    let correlator = Arc::new(Correlator::new());
    let sink = Arc::new(RecordingSink::new());

    let mut tasks = Vec::new();
    for i in 0..16 {
        let correlator = correlator.clone();
        let sink = sink.clone();
        tasks.push(tokio::spawn(async move {
            correlator
                .issue(sink.as_ref(), &format!("Cmd.n{i}"), json!({}), None)
                .await
        }));
    }
    for task in tasks {
        let _ = task.await.unwrap();
    }

    let mut ids = std::collections::HashSet::new();
    for frame in sink.frames() {
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert!(ids.insert(value["id"].as_u64().unwrap()));
    }
    assert_eq!(ids.len(), 16);
    assert_eq!(correlator.outstanding(), 16);
}

#[tokio::test]
async fn test_resolve_fulfills_future() {
    let correlator = Correlator::new();
    let sink = RecordingSink::new();

    let fut = correlator.issue(&sink, "Page.enable", json!({}), None).await;
    correlator.resolve(1, json!({"ok": true}));

    let result = fut.await.unwrap();
    assert_eq!(result["ok"], true);
    assert_eq!(correlator.outstanding(), 0);
}

#[tokio::test]
async fn test_reject_fails_future() {
    let correlator = Correlator::new();
    let sink = RecordingSink::new();

    let fut = correlator.issue(&sink, "Page.navigate", json!({}), None).await;
    correlator.reject(
        1,
        CdpError::Protocol {
            code: -32602,
            message: "Invalid params".to_string(),
        },
    );

    match fut.await {
        Err(CdpError::Protocol { code, message }) => {
            assert_eq!(code, -32602);
            assert_eq!(message, "Invalid params");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_id_is_ignored() {
    let correlator = Correlator::new();
    correlator.resolve(99, json!({}));
    correlator.reject(42, CdpError::ConnectionClosed);
    assert_eq!(correlator.outstanding(), 0);
}

#[tokio::test]
async fn test_fail_all_rejects_everything_once() {
    let correlator = Correlator::new();
    let sink = RecordingSink::new();

    let f1 = correlator.issue(&sink, "Page.enable", json!({}), None).await;
    let f2 = correlator.issue(&sink, "DOM.enable", json!({}), None).await;
    correlator.fail_all();

    assert!(matches!(f1.await, Err(CdpError::ConnectionClosed)));
    assert!(matches!(f2.await, Err(CdpError::ConnectionClosed)));
    assert_eq!(correlator.outstanding(), 0);

    // Issues after teardown reject without touching the transport.
    let frames_before = sink.frames().len();
    let f3 = correlator.issue(&sink, "Page.enable", json!({}), None).await;
    assert!(matches!(f3.await, Err(CdpError::ConnectionClosed)));
    assert_eq!(sink.frames().len(), frames_before);
}

#[tokio::test]
async fn test_sync_send_failure_rejects_immediately() {
    let correlator = Correlator::new();
    let sink = RecordingSink::new();
    sink.fail.store(true, Ordering::SeqCst);

    let fut = correlator.issue(&sink, "Page.enable", json!({}), None).await;
    assert!(matches!(fut.await, Err(CdpError::Transport(_))));
    assert_eq!(correlator.outstanding(), 0);
}

#[tokio::test]
async fn test_late_reply_after_dropped_future() {
    let correlator = Correlator::new();
    let sink = RecordingSink::new();

    let fut = correlator.issue(&sink, "Page.enable", json!({}), None).await;
    drop(fut);

    // Cancellation is advisory: the slot is still present until the reply
    // arrives, which is then discarded against the closed receiver.
    assert_eq!(correlator.outstanding(), 1);
    correlator.resolve(1, json!({}));
    assert_eq!(correlator.outstanding(), 0);
}
