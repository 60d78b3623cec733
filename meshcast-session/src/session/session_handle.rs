use crate::error::SessionError;
use crate::session::session_command::{SessionCommand, ShareOutcome};
use crate::session::session_event::SessionSnapshot;
use crate::transfer::{FileSendReport, SendOutcome};
use bytes::Bytes;
use meshcast_core::RoomId;
use std::path::Path;
use tokio::sync::{mpsc, oneshot};

/// Cloneable front door to a running `Session`.
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<SessionCommand>) -> Self {
        Self { command_tx }
    }

    async fn post(&self, cmd: SessionCommand) -> Result<(), SessionError> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| SessionError::Closed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.post(build(reply)).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn join_room(&self, room: impl Into<RoomId>) -> Result<(), SessionError> {
        self.post(SessionCommand::JoinRoom { room: room.into() })
            .await
    }

    /// Acquires local media and calls every known peer. Repeated calls are no-ops.
    pub async fn start_sharing(&self) -> Result<ShareOutcome, SessionError> {
        self.request(|reply| SessionCommand::StartSharing { reply })
            .await?
    }

    /// Broadcasts a chat message on every open channel.
    pub async fn send_chat(&self, text: impl Into<String>) -> Result<SendOutcome, SessionError> {
        let text = text.into();
        self.request(|reply| SessionCommand::SendChat { text, reply })
            .await?
    }

    /// Reads `path` and sends it on a single open channel.
    pub async fn send_file(&self, path: impl AsRef<Path>) -> Result<FileSendReport, SessionError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_owned());
        self.send_file_bytes(name, Bytes::from(data)).await
    }

    pub async fn send_file_bytes(
        &self,
        name: impl Into<String>,
        data: Bytes,
    ) -> Result<FileSendReport, SessionError> {
        let name = name.into();
        self.request(|reply| SessionCommand::SendFile { name, data, reply })
            .await?
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| SessionCommand::Snapshot { reply })
            .await
    }

    pub async fn shutdown(&self) {
        let _ = self.command_tx.send(SessionCommand::Shutdown).await;
    }
}
