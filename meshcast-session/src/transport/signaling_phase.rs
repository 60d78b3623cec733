use std::fmt;
use webrtc::peer_connection::signaling_state::RTCSignalingState;

/// Offer/answer progress of a single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalingPhase {
    Stable,
    HaveLocalOffer,
    HaveRemoteOffer,
    Closed,
}

impl From<RTCSignalingState> for SignalingPhase {
    fn from(state: RTCSignalingState) -> Self {
        match state {
            RTCSignalingState::HaveLocalOffer | RTCSignalingState::HaveLocalPranswer => {
                SignalingPhase::HaveLocalOffer
            }
            RTCSignalingState::HaveRemoteOffer | RTCSignalingState::HaveRemotePranswer => {
                SignalingPhase::HaveRemoteOffer
            }
            RTCSignalingState::Closed => SignalingPhase::Closed,
            RTCSignalingState::Stable | RTCSignalingState::Unspecified => SignalingPhase::Stable,
        }
    }
}

impl fmt::Display for SignalingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalingPhase::Stable => "stable",
            SignalingPhase::HaveLocalOffer => "have-local-offer",
            SignalingPhase::HaveRemoteOffer => "have-remote-offer",
            SignalingPhase::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}
