use crate::transfer::frame_sink::FrameSink;
use meshcast_core::{ChannelKey, ChannelMessage, ParticipantId, TransferError};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error};

/// Result of a fan-out send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Accepted by this many channels (at least one).
    Sent { channels: usize },
    NotSent,
}

/// Every open data channel of the session, across all peers and both directions.
#[derive(Default, Clone)]
pub struct ChannelSet {
    channels: BTreeMap<ChannelKey, Arc<dyn FrameSink>>,
}

impl ChannelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ChannelKey, sink: Arc<dyn FrameSink>) {
        self.channels.insert(key, sink);
    }

    pub fn remove(&mut self, key: &ChannelKey) -> bool {
        self.channels.remove(key).is_some()
    }

    /// Removes the channel under `key` unless it is still open. Returns whether
    /// anything was removed.
    pub fn remove_if_closed(&mut self, key: &ChannelKey) -> bool {
        match self.channels.get(key) {
            Some(sink) if !sink.is_open() => self.channels.remove(key).is_some(),
            _ => false,
        }
    }

    /// Drops both directions of a participant's channels.
    pub fn remove_participant(&mut self, participant: &ParticipantId) -> usize {
        let before = self.channels.len();
        self.channels.retain(|key, _| &key.participant != participant);
        before - self.channels.len()
    }

    /// The channel a file goes out on: lowest key that is still open.
    pub fn first(&self) -> Option<(ChannelKey, Arc<dyn FrameSink>)> {
        self.channels
            .iter()
            .find(|(_, sink)| sink.is_open())
            .map(|(key, sink)| (key.clone(), Arc::clone(sink)))
    }

    pub fn keys(&self) -> Vec<ChannelKey> {
        self.channels.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Sends a chat message on every open channel. Individual failures are logged.
    pub async fn broadcast_chat(&self, text: &str) -> Result<SendOutcome, TransferError> {
        let frame = ChannelMessage::Chat {
            content: text.to_owned(),
        }
        .encode()?;

        let mut accepted = 0;
        for (key, sink) in &self.channels {
            if !sink.is_open() {
                debug!("Skipping channel {} for chat: not open", key);
                continue;
            }
            match sink.send_text_frame(frame.clone()).await {
                Ok(()) => accepted += 1,
                Err(e) => error!("Failed to send chat on {}: {:?}", key, e),
            }
        }

        if accepted == 0 {
            Ok(SendOutcome::NotSent)
        } else {
            Ok(SendOutcome::Sent { channels: accepted })
        }
    }
}
