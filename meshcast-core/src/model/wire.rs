use crate::error::TransferError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Control messages carried as text frames on a data channel.
/// File chunks travel as bare binary frames with no envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChannelMessage {
    Chat { content: String },
    FileMeta { name: String, size: u64 },
}

impl ChannelMessage {
    pub fn encode(&self) -> Result<String, TransferError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(text: &str) -> Result<Self, TransferError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One message as delivered by the data channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Bytes),
}

impl Frame {
    /// Builds a frame from the raw parts a data channel hands out.
    pub fn from_parts(is_string: bool, data: Bytes) -> Result<Self, TransferError> {
        if is_string {
            let text = String::from_utf8(data.to_vec()).map_err(|_| TransferError::InvalidUtf8)?;
            Ok(Frame::Text(text))
        } else {
            Ok(Frame::Binary(data))
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Frame::Text(text) => text.len(),
            Frame::Binary(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
