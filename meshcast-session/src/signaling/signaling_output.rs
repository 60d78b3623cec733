use async_trait::async_trait;
use meshcast_core::{IceCandidate, ParticipantId, RoomId};

/// Outgoing half of the relay connection. Delivery failures are logged by the
/// implementation; the session never waits on the relay.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn join_room(&self, room: &RoomId);

    /// Sends an offer to `target`, tagged with our own id so the callee knows whom to answer.
    async fn send_offer(&self, target: ParticipantId, caller: ParticipantId, sdp: String);

    async fn send_answer(&self, target: ParticipantId, sdp: String);

    async fn send_ice(&self, target: ParticipantId, candidate: IceCandidate);
}
