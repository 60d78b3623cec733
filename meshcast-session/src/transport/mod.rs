mod connection_wrapper;
mod peer_manager;
mod signaling_phase;
mod transport_config;
mod transport_event;

pub use connection_wrapper::*;
pub use peer_manager::*;
pub use signaling_phase::*;
pub use transport_config::*;
pub use transport_event::*;
