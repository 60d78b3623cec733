use meshcast_core::{ParticipantId, RelayEvent};
use meshcast_session::ShareOutcome;

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{
    MockMediaSource, QUIET_PERIOD_MS, SIGNAL_TIMEOUT_MS, SignalMessage, wait_for_signal,
};

#[tokio::test]
async fn test_user_connected_twice_yields_one_offer() {
    init_tracing();

    let mut session = create_test_session(MockMediaSource::new());
    session.welcome("ME").await;

    let outcome = session.handle.start_sharing().await.unwrap();
    assert_eq!(outcome, ShareOutcome::Started { called: 0 });

    let p1 = ParticipantId::from("P1");
    session.relay(RelayEvent::UserConnected(p1.clone())).await;
    session.relay(RelayEvent::UserConnected(p1.clone())).await;

    let first = wait_for_signal(&mut session.signal_rx, SIGNAL_TIMEOUT_MS, |m| {
        matches!(m, SignalMessage::Offer { .. })
    })
    .await;
    assert!(first.is_some(), "expected an offer to P1");

    let second = wait_for_signal(&mut session.signal_rx, QUIET_PERIOD_MS, |m| {
        matches!(m, SignalMessage::Offer { .. })
    })
    .await;
    assert!(second.is_none(), "P1 was called twice");
    assert_eq!(session.signaling.offer_targets().await, vec![p1]);

    session.handle.shutdown().await;
}

#[tokio::test]
async fn test_newcomer_is_not_called_when_not_sharing() {
    init_tracing();

    let mut session = create_test_session(MockMediaSource::new());
    session.welcome("ME").await;
    session
        .relay(RelayEvent::UserConnected(ParticipantId::from("P1")))
        .await;

    let offer = wait_for_signal(&mut session.signal_rx, QUIET_PERIOD_MS, |m| {
        matches!(m, SignalMessage::Offer { .. })
    })
    .await;
    assert!(offer.is_none());

    session.handle.shutdown().await;
}
