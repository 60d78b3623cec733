pub use meshcast_core::{ParticipantId, PeerInfo, ReceivedFile, RoomId};

pub mod model {
    pub use meshcast_core::model::*;
}

pub mod error {
    pub use meshcast_core::error::*;
}

pub mod utils {
    pub use meshcast_core::utils::*;
}

#[cfg(feature = "session")]
pub mod session {
    pub use meshcast_session::*;
}
