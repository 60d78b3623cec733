use meshcast_core::{ParticipantId, RelayEvent};

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{MockMediaSource, QUIET_PERIOD_MS, SignalMessage, wait_for_signal};

#[tokio::test]
async fn test_offer_for_someone_else_is_dropped() {
    init_tracing();

    let mut session = create_test_session(MockMediaSource::new());
    session.welcome("ME").await;

    session
        .relay(RelayEvent::Offer {
            target: ParticipantId::from("SOMEONE-ELSE"),
            caller_id: ParticipantId::from("A"),
            sdp: "v=0".to_owned(),
        })
        .await;

    let answer = wait_for_signal(&mut session.signal_rx, QUIET_PERIOD_MS, |m| {
        matches!(m, SignalMessage::Answer { .. })
    })
    .await;
    assert!(answer.is_none());

    let snapshot = session.handle.snapshot().await.unwrap();
    assert!(snapshot.connections.is_empty());
    assert_eq!(session.signaling.answer_count().await, 0);

    session.handle.shutdown().await;
}
