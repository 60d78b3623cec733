use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::extract::WebSocketUpgrade;
use axum::extract::ws::{Message, WebSocket};
use axum::response::IntoResponse;
use axum::routing::get;
use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use meshcast_core::{ParticipantId, PeerInfo, RelayEvent, RelayRequest, RoomId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

struct RelayInner {
    peers: DashMap<ParticipantId, mpsc::UnboundedSender<Message>>,
    rooms: DashMap<ParticipantId, RoomId>,
}

/// Minimal in-process relay speaking the meshcast relay protocol.
/// Stamps `from` on every forwarded answer and candidate.
#[derive(Clone)]
pub struct MockRelay {
    inner: Arc<RelayInner>,
}

impl MockRelay {
    /// Binds to an ephemeral loopback port and returns the `ws://` url.
    pub async fn spawn() -> Result<(Self, String)> {
        let relay = Self {
            inner: Arc::new(RelayInner {
                peers: DashMap::new(),
                rooms: DashMap::new(),
            }),
        };

        let app = Router::new()
            .route("/", get(ws_handler))
            .with_state(relay.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind relay")?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                warn!("[MockRelay] server stopped: {:?}", e);
            }
        });

        Ok((relay, format!("ws://{}/", addr)))
    }

    pub fn connected(&self) -> usize {
        self.inner.peers.len()
    }

    fn send(&self, to: &ParticipantId, event: &RelayEvent) {
        let Some(peer) = self.inner.peers.get(to) else {
            warn!("[MockRelay] no such participant {}", to);
            return;
        };
        if let Ok(json) = serde_json::to_string(event) {
            let _ = peer.send(Message::Text(json.into()));
        }
    }

    fn members(&self, room: &RoomId) -> Vec<ParticipantId> {
        self.inner
            .rooms
            .iter()
            .filter(|entry| entry.value() == room)
            .map(|entry| entry.key().clone())
            .collect()
    }

    fn broadcast_user_list(&self, room: &RoomId) {
        let members = self.members(room);
        let list: Vec<PeerInfo> = members
            .iter()
            .map(|id| PeerInfo {
                id: id.clone(),
                address_label: Some("127.0.0.1".to_owned()),
            })
            .collect();
        for id in &members {
            self.send(id, &RelayEvent::UpdateUserList(list.clone()));
        }
    }

    fn handle_request(&self, from: &ParticipantId, request: RelayRequest) {
        match request {
            RelayRequest::JoinRoom { room_id } => {
                let others = self.members(&room_id);
                self.inner.rooms.insert(from.clone(), room_id.clone());

                self.send(from, &RelayEvent::AllUsers(others.clone()));
                for other in &others {
                    self.send(other, &RelayEvent::UserConnected(from.clone()));
                }
                self.broadcast_user_list(&room_id);
            }
            RelayRequest::Offer { target, sdp, .. } => {
                let event = RelayEvent::Offer {
                    target: target.clone(),
                    caller_id: from.clone(),
                    sdp,
                };
                self.send(&target, &event);
            }
            RelayRequest::Answer { target, sdp } => {
                let event = RelayEvent::Answer {
                    target: target.clone(),
                    sdp,
                    from: Some(from.clone()),
                };
                self.send(&target, &event);
            }
            RelayRequest::IceCandidate { target, candidate } => {
                let event = RelayEvent::IceCandidate {
                    target: target.clone(),
                    candidate,
                    from: Some(from.clone()),
                };
                self.send(&target, &event);
            }
        }
    }

    fn remove(&self, id: &ParticipantId) {
        self.inner.peers.remove(id);
        let Some((_, room)) = self.inner.rooms.remove(id) else {
            return;
        };
        for other in self.members(&room) {
            self.send(&other, &RelayEvent::UserDisconnected(id.clone()));
        }
        self.broadcast_user_list(&room);
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(relay): State<MockRelay>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

async fn handle_socket(socket: WebSocket, relay: MockRelay) {
    let id = ParticipantId::from(Uuid::new_v4().to_string());
    info!("[MockRelay] connection {}", id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();
    relay.inner.peers.insert(id.clone(), tx);
    relay.send(
        &id,
        &RelayEvent::Welcome {
            participant_id: id.clone(),
        },
    );

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let relay = relay.clone();
        let id = id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => {
                        match serde_json::from_str::<RelayRequest>(text.as_str()) {
                            Ok(request) => relay.handle_request(&id, request),
                            Err(e) => warn!("[MockRelay] bad frame from {}: {:?}", id, e),
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    relay.remove(&id);
    info!("[MockRelay] disconnected {}", id);
}
