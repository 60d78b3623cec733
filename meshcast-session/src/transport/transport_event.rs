use meshcast_core::{ChannelKey, Frame, IceCandidate, ParticipantId};
use std::sync::Arc;
use webrtc::data_channel::RTCDataChannel;
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::track::track_remote::TrackRemote;

/// Events the webrtc callbacks post back to the session loop.
pub enum TransportEvent {
    /// A local candidate was found and has to reach the remote side through the relay.
    CandidateGenerated(ParticipantId, IceCandidate),

    ConnectivityChanged(ParticipantId, RTCIceConnectionState),

    /// The remote side started sending media.
    RemoteTrack(ParticipantId, Arc<TrackRemote>),

    /// A data channel (either direction) is open and writable.
    ChannelOpened(ChannelKey, Arc<RTCDataChannel>),

    ChannelMessage(ChannelKey, Frame),

    ChannelClosed(ChannelKey),
}
