use thiserror::Error;

/// Failures of the data channel transfer protocol.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("text frame is not valid UTF-8")]
    InvalidUtf8,

    #[error("malformed channel message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("no open data channel")]
    NoOpenChannel,

    #[error("data channel '{0}' closed")]
    ChannelClosed(String),

    #[error("send failed: {0}")]
    Send(String),
}

/// Failures acquiring local screen/audio content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("permission to capture was denied")]
    PermissionDenied,

    #[error("no capture device available")]
    NoDevice,

    #[error("capture failed: {0}")]
    Capture(String),
}
