use meshcast_core::{MediaError, TransferError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session is no longer running")]
    Closed,

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Media(#[from] MediaError),
}
