mod channel;
mod file;
mod participant;
mod relay;
mod room;
mod wire;

pub use channel::{ChannelDirection, ChannelKey};
pub use file::ReceivedFile;
pub use participant::{ParticipantId, PeerInfo};
pub use relay::{IceCandidate, RelayEvent, RelayRequest};
pub use room::RoomId;
pub use wire::{ChannelMessage, Frame};
