use crate::signaling::signaling_output::SignalingOutput;
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use meshcast_core::{IceCandidate, ParticipantId, RelayEvent, RelayRequest, RoomId};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// WebSocket connection to the relay.
///
/// Writes go through an unbounded queue drained by a writer task, so sends
/// never block the caller. A reader task parses frames into `RelayEvent`s in
/// arrival order; the returned receiver closes when the socket does.
#[derive(Clone)]
pub struct RelayClient {
    tx: mpsc::UnboundedSender<Message>,
}

impl RelayClient {
    pub async fn connect(url: &str) -> Result<(Self, mpsc::Receiver<RelayEvent>)> {
        let (ws, _) = connect_async(url)
            .await
            .with_context(|| format!("Failed to connect to relay at {}", url))?;
        info!("Connected to relay {}", url);

        let (mut sender, mut receiver) = ws.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
        let (event_tx, event_rx) = mpsc::channel::<RelayEvent>(256);

        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if let Err(e) = sender.send(msg).await {
                    error!("Relay write failed: {:?}", e);
                    break;
                }
            }
            let _ = sender.close().await;
        });

        tokio::spawn(async move {
            while let Some(frame) = receiver.next().await {
                let msg = match frame {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!("Relay read failed: {:?}", e);
                        break;
                    }
                };
                match msg {
                    Message::Text(text) => {
                        match serde_json::from_str::<RelayEvent>(text.as_str()) {
                            Ok(event) => {
                                debug!("Relay event '{}'", event.name());
                                if event_tx.send(event).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => warn!("Ignoring unparseable relay frame: {:?}", e),
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            info!("Relay connection closed");
        });

        Ok((Self { tx }, event_rx))
    }

    fn send_request(&self, request: RelayRequest) {
        match serde_json::to_string(&request) {
            Ok(json) => {
                if let Err(e) = self.tx.send(Message::Text(json.into())) {
                    error!("Failed to queue relay message: {:?}", e);
                }
            }
            Err(e) => error!("Failed to serialize relay request: {}", e),
        }
    }
}

#[async_trait]
impl SignalingOutput for RelayClient {
    async fn join_room(&self, room: &RoomId) {
        self.send_request(RelayRequest::JoinRoom {
            room_id: room.clone(),
        });
    }

    async fn send_offer(&self, target: ParticipantId, caller: ParticipantId, sdp: String) {
        self.send_request(RelayRequest::Offer {
            target,
            caller_id: caller,
            sdp,
        });
    }

    async fn send_answer(&self, target: ParticipantId, sdp: String) {
        self.send_request(RelayRequest::Answer { target, sdp });
    }

    async fn send_ice(&self, target: ParticipantId, candidate: IceCandidate) {
        self.send_request(RelayRequest::IceCandidate { target, candidate });
    }
}
