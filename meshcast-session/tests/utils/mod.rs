pub mod mock_relay;
pub mod mock_signaling;
pub mod session_helpers;

pub use mock_media::*;
pub use mock_relay::*;
pub use mock_signaling::*;
pub use session_helpers::*;
