mod channel_set;
mod frame_sink;
mod inbound;
mod outbound;


pub use channel_set::*;
pub use frame_sink::*;
pub use inbound::*;
pub use outbound::*;
