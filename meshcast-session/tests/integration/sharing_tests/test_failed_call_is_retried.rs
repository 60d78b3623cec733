use meshcast_core::{ParticipantId, RelayEvent};
use meshcast_session::{SessionEvent, ShareOutcome};

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{
    MockMediaSource, QUIET_PERIOD_MS, SIGNAL_TIMEOUT_MS, SignalMessage, wait_for_event,
    wait_for_signal,
};

#[tokio::test]
async fn test_peer_is_called_once_local_id_arrives() {
    init_tracing();

    let mut session = create_test_session(MockMediaSource::new());
    let a = ParticipantId::from("A");

    session.relay(RelayEvent::AllUsers(vec![a.clone()])).await;
    let listed = wait_for_event(&mut session.events, SIGNAL_TIMEOUT_MS, |e| {
        matches!(e, SessionEvent::PeersChanged(peers) if !peers.is_empty())
    })
    .await;
    assert!(listed.is_some(), "peer list never updated");

    // No local id yet, so the offer cannot go out.
    let outcome = session.handle.start_sharing().await.unwrap();
    assert_eq!(outcome, ShareOutcome::Started { called: 0 });
    assert!(session.signaling.offer_targets().await.is_empty());

    session.welcome("ME").await;
    let offer = wait_for_signal(&mut session.signal_rx, SIGNAL_TIMEOUT_MS, |m| {
        matches!(m, SignalMessage::Offer { .. })
    })
    .await;
    assert!(offer.is_some(), "A was not called after the local id arrived");

    session.relay(RelayEvent::UserConnected(a.clone())).await;
    let again = wait_for_signal(&mut session.signal_rx, QUIET_PERIOD_MS, |m| {
        matches!(m, SignalMessage::Offer { .. })
    })
    .await;
    assert!(again.is_none(), "A was called twice");
    assert_eq!(session.signaling.offer_targets().await, vec![a]);

    session.handle.shutdown().await;
}
