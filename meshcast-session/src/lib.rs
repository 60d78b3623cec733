pub mod error;
pub mod media;
pub mod registry;
pub mod session;
pub mod signaling;
pub mod transfer;
pub mod transport;

pub use error::SessionError;
pub use media::*;
pub use registry::*;
pub use session::*;
pub use signaling::*;
pub use transfer::*;
pub use transport::*;
