use meshcast_core::{ParticipantId, RoomId};

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{MockMediaSource, SIGNAL_TIMEOUT_MS, wait_for_snapshot};

#[tokio::test]
async fn test_join_room_and_welcome() {
    init_tracing();

    let session = create_test_session(MockMediaSource::new());

    session.handle.join_room("lobby").await.unwrap();
    session.welcome("ME").await;

    let (ok, snapshot) = wait_for_snapshot(&session.handle, SIGNAL_TIMEOUT_MS, |s| {
        s.local_id.is_some()
    })
    .await;
    assert!(ok, "local id was never set");
    assert_eq!(snapshot.local_id, Some(ParticipantId::from("ME")));
    assert!(snapshot.status.contains("Connected as ME"));
    assert_eq!(
        session.signaling.joined_rooms().await,
        vec![RoomId::from("lobby")]
    );

    session.handle.shutdown().await;
}
