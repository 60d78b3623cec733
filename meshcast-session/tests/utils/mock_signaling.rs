use async_trait::async_trait;
use meshcast_core::{IceCandidate, ParticipantId, RoomId};
use meshcast_session::SignalingOutput;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

#[derive(Debug, Clone)]
pub enum SignalMessage {
    Join {
        room: RoomId,
    },
    Offer {
        target: ParticipantId,
        caller: ParticipantId,
        sdp: String,
    },
    Answer {
        target: ParticipantId,
        sdp: String,
    },
    Ice {
        target: ParticipantId,
        candidate: IceCandidate,
    },
}

/// Mock SignalingOutput that captures all outgoing signals.
#[derive(Clone)]
pub struct MockSignalingOutput {
    /// Channel to send captured signals.
    tx: mpsc::UnboundedSender<SignalMessage>,
    /// All captured signals (for verification).
    signals: Arc<Mutex<Vec<SignalMessage>>>,
}

impl MockSignalingOutput {
    /// Create a new MockSignalingOutput and its receiver channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SignalMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let signaling = Self {
            tx,
            signals: Arc::new(Mutex::new(Vec::new())),
        };
        (signaling, rx)
    }

    async fn record(&self, msg: SignalMessage) {
        self.signals.lock().await.push(msg.clone());
        let _ = self.tx.send(msg);
    }

    /// Targets of every offer sent so far, in order.
    pub async fn offer_targets(&self) -> Vec<ParticipantId> {
        self.signals
            .lock()
            .await
            .iter()
            .filter_map(|s| match s {
                SignalMessage::Offer { target, .. } => Some(target.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn answer_count(&self) -> usize {
        self.signals
            .lock()
            .await
            .iter()
            .filter(|s| matches!(s, SignalMessage::Answer { .. }))
            .count()
    }

    pub async fn joined_rooms(&self) -> Vec<RoomId> {
        self.signals
            .lock()
            .await
            .iter()
            .filter_map(|s| match s {
                SignalMessage::Join { room } => Some(room.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    async fn join_room(&self, room: &RoomId) {
        tracing::debug!("[MockSignaling] join_room {}", room);
        self.record(SignalMessage::Join { room: room.clone() })
            .await;
    }

    async fn send_offer(&self, target: ParticipantId, caller: ParticipantId, sdp: String) {
        tracing::debug!("[MockSignaling] send_offer to {}", target);
        self.record(SignalMessage::Offer {
            target,
            caller,
            sdp,
        })
        .await;
    }

    async fn send_answer(&self, target: ParticipantId, sdp: String) {
        tracing::debug!("[MockSignaling] send_answer to {}", target);
        self.record(SignalMessage::Answer { target, sdp }).await;
    }

    async fn send_ice(&self, target: ParticipantId, candidate: IceCandidate) {
        tracing::debug!("[MockSignaling] send_ice to {}", target);
        self.record(SignalMessage::Ice { target, candidate }).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signaling_captures_offer() {
        let (signaling, mut rx) = MockSignalingOutput::new();

        signaling
            .send_offer(ParticipantId::from("B"), ParticipantId::from("A"), "v=0".to_owned())
            .await;

        let msg = rx.recv().await.unwrap();
        assert!(matches!(msg, SignalMessage::Offer { .. }));
        assert_eq!(signaling.offer_targets().await, vec![ParticipantId::from("B")]);
    }
}
