pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_3: &str = "stun:stun2.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_4: &str = "stun:stun3.l.google.com:19302";

/// Size of the binary pieces a file is cut into before sending.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Buffered bytes above which the sender waits before queueing another chunk.
pub const DEFAULT_BUFFERED_AMOUNT_HIGH: usize = 1024 * 1024;

pub const DEFAULT_CHANNEL_LABEL: &str = "meshcast";
