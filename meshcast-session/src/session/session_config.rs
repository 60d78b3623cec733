use crate::transport::TransportConfig;
use meshcast_core::utils::{DEFAULT_BUFFERED_AMOUNT_HIGH, DEFAULT_CHANNEL_LABEL, DEFAULT_CHUNK_SIZE};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub transport: TransportConfig,
    /// Size of each binary frame of an outgoing file.
    pub chunk_size: usize,
    /// Queue size above which file sending pauses.
    pub buffered_amount_high: usize,
    pub channel_label: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            buffered_amount_high: DEFAULT_BUFFERED_AMOUNT_HIGH,
            channel_label: DEFAULT_CHANNEL_LABEL.to_owned(),
        }
    }
}
