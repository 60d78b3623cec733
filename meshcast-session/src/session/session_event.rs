use crate::transport::SignalingPhase;
use meshcast_core::{ChannelKey, ParticipantId, PeerInfo, ReceivedFile};
use std::fmt;
use std::sync::Arc;
use webrtc::track::track_remote::TrackRemote;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAuthor {
    Local,
    Remote(ParticipantId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub author: ChatAuthor,
    pub text: String,
}

impl fmt::Display for ChatLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.author {
            ChatAuthor::Local => write!(f, "me: {}", self.text),
            ChatAuthor::Remote(id) => write!(f, "{}: {}", id.short(), self.text),
        }
    }
}

/// Everything the session reports to its owner, in the order it happened.
pub enum SessionEvent {
    Status(String),
    Chat(ChatLine),
    PeersChanged(Vec<PeerInfo>),
    RemoteTrack {
        participant: ParticipantId,
        track: Arc<TrackRemote>,
    },
    FileReceived {
        from: ParticipantId,
        file: ReceivedFile,
    },
    /// A send was requested but there is nobody to send to yet.
    NotReady(String),
}

impl fmt::Debug for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Status(s) => f.debug_tuple("Status").field(s).finish(),
            SessionEvent::Chat(line) => f.debug_tuple("Chat").field(line).finish(),
            SessionEvent::PeersChanged(peers) => {
                f.debug_tuple("PeersChanged").field(peers).finish()
            }
            SessionEvent::RemoteTrack { participant, track } => f
                .debug_struct("RemoteTrack")
                .field("participant", participant)
                .field("track", &track.id())
                .finish(),
            SessionEvent::FileReceived { from, file } => f
                .debug_struct("FileReceived")
                .field("from", from)
                .field("name", &file.name)
                .field("len", &file.len())
                .finish(),
            SessionEvent::NotReady(s) => f.debug_tuple("NotReady").field(s).finish(),
        }
    }
}

/// Point-in-time copy of the session state.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub local_id: Option<ParticipantId>,
    pub status: String,
    pub sharing: bool,
    pub peers: Vec<PeerInfo>,
    pub chat_log: Vec<ChatLine>,
    pub connections: Vec<(ParticipantId, SignalingPhase)>,
    pub open_channels: Vec<ChannelKey>,
}
