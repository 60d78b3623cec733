use meshcast_session::{SessionEvent, SessionHandle, SessionSnapshot};
use std::time::Duration;
use tokio::sync::mpsc;

use super::mock_signaling::SignalMessage;

/// Timeout for signal exchange operations (ms).
pub const SIGNAL_TIMEOUT_MS: u64 = 5000;

/// Timeout for connection establishment (ms).
pub const CONNECTION_TIMEOUT_MS: u64 = 15000;

/// Window in which something must NOT happen (ms).
pub const QUIET_PERIOD_MS: u64 = 300;

/// Waits for the first session event matching `pred`, skipping the rest.
pub async fn wait_for_event<F>(
    events: &mut mpsc::UnboundedReceiver<SessionEvent>,
    timeout_ms: u64,
    mut pred: F,
) -> Option<SessionEvent>
where
    F: FnMut(&SessionEvent) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        match tokio::time::timeout_at(deadline, events.recv()).await {
            Ok(Some(event)) if pred(&event) => return Some(event),
            Ok(Some(_)) => continue,
            Ok(None) | Err(_) => return None,
        }
    }
}

/// Waits for the first outgoing signal matching `pred`.
pub async fn wait_for_signal<F>(
    signal_rx: &mut mpsc::UnboundedReceiver<SignalMessage>,
    timeout_ms: u64,
    mut pred: F,
) -> Option<SignalMessage>
where
    F: FnMut(&SignalMessage) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        match tokio::time::timeout_at(deadline, signal_rx.recv()).await {
            Ok(Some(msg)) if pred(&msg) => return Some(msg),
            Ok(Some(_)) => continue,
            Ok(None) | Err(_) => return None,
        }
    }
}

/// Polls snapshots until `pred` holds. Returns the last snapshot either way.
pub async fn wait_for_snapshot<F>(
    handle: &SessionHandle,
    timeout_ms: u64,
    mut pred: F,
) -> (bool, SessionSnapshot)
where
    F: FnMut(&SessionSnapshot) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        let snapshot = handle.snapshot().await.expect("session stopped");
        if pred(&snapshot) {
            return (true, snapshot);
        }
        if tokio::time::Instant::now() >= deadline {
            return (false, snapshot);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
