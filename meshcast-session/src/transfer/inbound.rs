use bytes::{Bytes, BytesMut};
use meshcast_core::{ChannelMessage, Frame, ReceivedFile, TransferError};
use tracing::{debug, warn};

/// What a frame turned into once the receiving side has made sense of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Chat(String),
    File(ReceivedFile),
}

struct PendingFile {
    name: String,
    size: u64,
    received: u64,
    chunks: Vec<Bytes>,
}

impl PendingFile {
    fn assemble(self) -> ReceivedFile {
        let mut data = BytesMut::with_capacity(self.received as usize);
        for chunk in &self.chunks {
            data.extend_from_slice(chunk);
        }
        ReceivedFile {
            name: self.name,
            data: data.freeze(),
        }
    }
}

/// Receive-side state of one data channel.
///
/// At most one file is in flight. A new `file-meta` replaces an unfinished
/// transfer, and a transfer completes as soon as the accumulated length
/// reaches the announced size (trailing bytes in the last chunk are kept).
#[derive(Default)]
pub struct InboundTransfer {
    pending: Option<PendingFile>,
}

impl InboundTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(name, received, size)` of the unfinished transfer, if any.
    pub fn progress(&self) -> Option<(&str, u64, u64)> {
        self.pending
            .as_ref()
            .map(|p| (p.name.as_str(), p.received, p.size))
    }

    pub fn on_frame(&mut self, frame: Frame) -> Result<Option<Delivery>, TransferError> {
        match frame {
            Frame::Text(text) => match ChannelMessage::decode(&text)? {
                ChannelMessage::Chat { content } => Ok(Some(Delivery::Chat(content))),
                ChannelMessage::FileMeta { name, size } => Ok(self.begin(name, size)),
            },
            Frame::Binary(chunk) => Ok(self.append(chunk)),
        }
    }

    fn begin(&mut self, name: String, size: u64) -> Option<Delivery> {
        if let Some(old) = self.pending.take() {
            debug!(
                "Discarding unfinished transfer '{}' ({}/{} bytes)",
                old.name, old.received, old.size
            );
        }

        if size == 0 {
            return Some(Delivery::File(ReceivedFile {
                name,
                data: Bytes::new(),
            }));
        }

        self.pending = Some(PendingFile {
            name,
            size,
            received: 0,
            chunks: Vec::new(),
        });
        None
    }

    fn append(&mut self, chunk: Bytes) -> Option<Delivery> {
        let Some(pending) = self.pending.as_mut() else {
            warn!("Ignoring {} byte chunk with no file announced", chunk.len());
            return None;
        };

        pending.received += chunk.len() as u64;
        pending.chunks.push(chunk);

        if pending.received < pending.size {
            return None;
        }

        let done = self.pending.take()?;
        Some(Delivery::File(done.assemble()))
    }
}
