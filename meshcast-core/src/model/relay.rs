use crate::model::participant::{ParticipantId, PeerInfo};
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

/// Connectivity candidate in the shape browsers emit from `RTCIceCandidate.toJSON()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default)]
    pub sdp_mid: Option<String>,
    #[serde(default)]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

/// Frames a client sends to the relay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum RelayRequest {
    JoinRoom {
        room_id: RoomId,
    },
    Offer {
        target: ParticipantId,
        caller_id: ParticipantId,
        sdp: String,
    },
    Answer {
        target: ParticipantId,
        sdp: String,
    },
    IceCandidate {
        target: ParticipantId,
        candidate: IceCandidate,
    },
}

/// Frames the relay pushes to a client.
///
/// `from` on answers and candidates is stamped by the relay with the sender's
/// connection id. Relays that do not stamp it leave it empty and the receiver
/// has to guess which connection the message belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum RelayEvent {
    Welcome {
        participant_id: ParticipantId,
    },
    UserConnected(ParticipantId),
    UserDisconnected(ParticipantId),
    AllUsers(Vec<ParticipantId>),
    UpdateUserList(Vec<PeerInfo>),
    Offer {
        target: ParticipantId,
        caller_id: ParticipantId,
        sdp: String,
    },
    Answer {
        target: ParticipantId,
        sdp: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<ParticipantId>,
    },
    IceCandidate {
        target: ParticipantId,
        candidate: IceCandidate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<ParticipantId>,
    },
}

impl RelayEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RelayEvent::Welcome { .. } => "welcome",
            RelayEvent::UserConnected(_) => "user-connected",
            RelayEvent::UserDisconnected(_) => "user-disconnected",
            RelayEvent::AllUsers(_) => "all-users",
            RelayEvent::UpdateUserList(_) => "update-user-list",
            RelayEvent::Offer { .. } => "offer",
            RelayEvent::Answer { .. } => "answer",
            RelayEvent::IceCandidate { .. } => "ice-candidate",
        }
    }
}
