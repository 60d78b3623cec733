use meshcast_core::{ParticipantId, PeerInfo, RelayEvent};
use meshcast_session::ShareOutcome;

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{
    MockMediaSource, QUIET_PERIOD_MS, SIGNAL_TIMEOUT_MS, SignalMessage, wait_for_signal,
};

#[tokio::test]
async fn test_members_listed_after_share_are_called_once() {
    init_tracing();

    let mut session = create_test_session(MockMediaSource::new());
    session.welcome("ME").await;

    // Sharing before the relay has told us who is in the room.
    let outcome = session.handle.start_sharing().await.unwrap();
    assert_eq!(outcome, ShareOutcome::Started { called: 0 });

    let a = ParticipantId::from("A");
    session
        .relay(RelayEvent::AllUsers(vec![ParticipantId::from("ME"), a.clone()]))
        .await;

    let offer = wait_for_signal(&mut session.signal_rx, SIGNAL_TIMEOUT_MS, |m| {
        matches!(m, SignalMessage::Offer { .. })
    })
    .await;
    let Some(SignalMessage::Offer { target, caller, .. }) = offer else {
        panic!("room member A was never called");
    };
    assert_eq!(target, a);
    assert_eq!(caller, ParticipantId::from("ME"));

    session
        .relay(RelayEvent::UpdateUserList(vec![
            PeerInfo::new(ParticipantId::from("ME")),
            PeerInfo::new(a.clone()),
        ]))
        .await;
    session.relay(RelayEvent::UserConnected(a.clone())).await;

    let again = wait_for_signal(&mut session.signal_rx, QUIET_PERIOD_MS, |m| {
        matches!(m, SignalMessage::Offer { .. })
    })
    .await;
    assert!(again.is_none(), "A was called twice");
    assert_eq!(session.signaling.offer_targets().await, vec![a]);

    let snapshot = session.handle.snapshot().await.unwrap();
    assert!(snapshot.sharing);
    assert_eq!(snapshot.connections.len(), 1);

    session.handle.shutdown().await;
}
