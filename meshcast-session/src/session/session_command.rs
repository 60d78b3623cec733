use crate::error::SessionError;
use crate::session::session_event::SessionSnapshot;
use crate::transfer::{FileSendReport, SendOutcome};
use bytes::Bytes;
use meshcast_core::RoomId;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Media acquired; `called` peers were sent an offer.
    Started { called: usize },
    AlreadySharing,
}

/// Requests from a `SessionHandle` to the session loop.
pub enum SessionCommand {
    JoinRoom {
        room: RoomId,
    },

    StartSharing {
        reply: oneshot::Sender<Result<ShareOutcome, SessionError>>,
    },

    SendChat {
        text: String,
        reply: oneshot::Sender<Result<SendOutcome, SessionError>>,
    },

    /// File contents are read by the handle before the command is posted.
    SendFile {
        name: String,
        data: Bytes,
        reply: oneshot::Sender<Result<FileSendReport, SessionError>>,
    },

    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },

    Shutdown,
}
