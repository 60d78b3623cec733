use bytes::Bytes;
use meshcast_core::TransferError;
use meshcast_session::{SendOutcome, SessionError, SessionEvent};

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{MockMediaSource, SIGNAL_TIMEOUT_MS, wait_for_event};

#[tokio::test]
async fn test_chat_without_channels_is_not_logged() {
    init_tracing();

    let mut session = create_test_session(MockMediaSource::new());

    let outcome = session.handle.send_chat("anyone there?").await.unwrap();
    assert_eq!(outcome, SendOutcome::NotSent);

    let not_ready = wait_for_event(&mut session.events, SIGNAL_TIMEOUT_MS, |e| {
        matches!(e, SessionEvent::NotReady(_))
    })
    .await;
    assert!(not_ready.is_some());

    let snapshot = session.handle.snapshot().await.unwrap();
    assert!(snapshot.chat_log.is_empty());

    session.handle.shutdown().await;
}

#[tokio::test]
async fn test_file_without_channels_fails() {
    init_tracing();

    let session = create_test_session(MockMediaSource::new());

    let err = session
        .handle
        .send_file_bytes("notes.txt", Bytes::from_static(b"hello"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Transfer(TransferError::NoOpenChannel)
    ));

    session.handle.shutdown().await;
}

#[tokio::test]
async fn test_missing_file_is_an_io_error() {
    init_tracing();

    let session = create_test_session(MockMediaSource::new());

    let err = session
        .handle
        .send_file("/definitely/not/here.bin")
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Io(_)));

    session.handle.shutdown().await;
}
