use crate::error::SessionError;
use crate::media::MediaSource;
use crate::registry::PeerRegistry;
use crate::session::session_command::{SessionCommand, ShareOutcome};
use crate::session::session_config::SessionConfig;
use crate::session::session_event::{ChatAuthor, ChatLine, SessionEvent, SessionSnapshot};
use crate::session::session_handle::SessionHandle;
use crate::signaling::{RelayClient, SignalingOutput};
use crate::transfer::{ChannelSet, Delivery, FrameSink, InboundTransfer, SendOutcome, send_file};
use crate::transport::{PeerManager, TransportEvent};
use anyhow::Result;
use meshcast_core::{ChannelKey, ParticipantId, RelayEvent, TransferError};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;

/// The session actor. Owns the peer links, the membership view, the open
/// channels and the chat log, and processes one event at a time.
pub struct Session {
    config: SessionConfig,
    media_source: Arc<dyn MediaSource>,
    signaling: Arc<dyn SignalingOutput>,
    peers: PeerManager,
    registry: PeerRegistry,
    channels: ChannelSet,
    inbound: BTreeMap<ChannelKey, InboundTransfer>,
    chat_log: Vec<ChatLine>,
    status: String,
    sharing: bool,
    called: HashSet<ParticipantId>,
    command_rx: mpsc::Receiver<SessionCommand>,
    relay_rx: mpsc::Receiver<RelayEvent>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        media_source: Arc<dyn MediaSource>,
        signaling: Arc<dyn SignalingOutput>,
        relay_rx: mpsc::Receiver<RelayEvent>,
    ) -> (Self, SessionHandle, mpsc::UnboundedReceiver<SessionEvent>) {
        let (command_tx, command_rx) = mpsc::channel(100);
        let (transport_tx, transport_rx) = mpsc::channel(256);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let peers = PeerManager::new(
            config.transport.clone(),
            config.channel_label.clone(),
            transport_tx,
            Arc::clone(&signaling),
        );

        let session = Self {
            config,
            media_source,
            signaling,
            peers,
            registry: PeerRegistry::new(),
            channels: ChannelSet::new(),
            inbound: BTreeMap::new(),
            chat_log: Vec::new(),
            status: "Disconnected".to_owned(),
            sharing: false,
            called: HashSet::new(),
            command_rx,
            relay_rx,
            transport_rx,
            event_tx,
        };

        (session, SessionHandle::new(command_tx), event_rx)
    }

    /// Connects to the relay at `url` and starts a session loop on the current runtime.
    pub async fn connect(
        url: &str,
        config: SessionConfig,
        media_source: Arc<dyn MediaSource>,
    ) -> Result<(SessionHandle, mpsc::UnboundedReceiver<SessionEvent>)> {
        let (relay, relay_rx) = RelayClient::connect(url).await?;
        let (session, handle, events) = Session::new(config, media_source, Arc::new(relay), relay_rx);
        tokio::spawn(session.run());
        Ok((handle, events))
    }

    pub async fn run(mut self) {
        info!("Session event loop started");
        let mut relay_open = true;

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::Shutdown) | None => {
                            info!("Shutdown requested");
                            break;
                        }
                        Some(c) => self.handle_command(c).await,
                    }
                }

                evt = self.relay_rx.recv(), if relay_open => {
                    match evt {
                        Some(e) => self.handle_relay_event(e).await,
                        None => {
                            warn!("Relay connection lost");
                            relay_open = false;
                            self.set_status("Relay connection lost".to_owned());
                        }
                    }
                }

                evt = self.transport_rx.recv() => {
                    match evt {
                        Some(e) => self.handle_transport_event(e).await,
                        None => {
                            warn!("Transport channel closed unexpectedly");
                            break;
                        }
                    }
                }
            }
        }

        self.peers.close_all().await;
        info!("Session event loop finished");
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }

    fn set_status(&mut self, status: String) {
        info!("Status: {}", status);
        self.status = status.clone();
        self.emit(SessionEvent::Status(status));
    }

    fn peers_changed(&self) {
        self.emit(SessionEvent::PeersChanged(self.registry.snapshot()));
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::JoinRoom { room } => {
                self.signaling.join_room(&room).await;
                self.set_status(format!("Joining room {}", room));
            }

            SessionCommand::StartSharing { reply } => {
                let result = self.start_sharing().await;
                let _ = reply.send(result);
            }

            SessionCommand::SendChat { text, reply } => {
                let result = self.send_chat(text).await;
                let _ = reply.send(result);
            }

            SessionCommand::SendFile { name, data, reply } => {
                let Some((key, sink)) = self.channels.first() else {
                    self.emit(SessionEvent::NotReady(format!(
                        "No open data channel to send '{}' on",
                        name
                    )));
                    let _ = reply.send(Err(TransferError::NoOpenChannel.into()));
                    return;
                };

                self.set_status(format!("Sending '{}' to {}", name, key.participant.short()));
                let chunk_size = self.config.chunk_size;
                let high_water = self.config.buffered_amount_high;
                tokio::spawn(async move {
                    let result = send_file(sink.as_ref(), &name, data, chunk_size, high_water)
                        .await
                        .map_err(SessionError::from);
                    let _ = reply.send(result);
                });
            }

            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }

            SessionCommand::Shutdown => {}
        }
    }

    async fn start_sharing(&mut self) -> Result<ShareOutcome, SessionError> {
        if self.sharing {
            return Ok(ShareOutcome::AlreadySharing);
        }

        let media = match self.media_source.acquire().await {
            Ok(media) => media,
            Err(e) => {
                warn!("Failed to acquire local media: {:?}", e);
                self.set_status(format!("Media unavailable: {}", e));
                return Err(e.into());
            }
        };

        self.peers.attach_media(media);
        self.sharing = true;
        self.set_status("Sharing".to_owned());

        let called = self.call_known_peers().await;
        Ok(ShareOutcome::Started { called })
    }

    /// Calls every known peer that has not been called yet. A peer only counts
    /// as called once an offer actually went out.
    async fn call_known_peers(&mut self) -> usize {
        let mut called = 0;
        for id in self.registry.remote_ids() {
            if self.called.contains(&id) {
                continue;
            }
            if self.peers.initiate_call(&id).await {
                self.called.insert(id);
                called += 1;
            }
        }
        called
    }

    async fn send_chat(&mut self, text: String) -> Result<SendOutcome, SessionError> {
        let outcome = self.channels.broadcast_chat(&text).await?;
        match outcome {
            SendOutcome::Sent { .. } => {
                let line = ChatLine {
                    author: ChatAuthor::Local,
                    text,
                };
                self.chat_log.push(line.clone());
                self.emit(SessionEvent::Chat(line));
            }
            SendOutcome::NotSent => {
                self.emit(SessionEvent::NotReady(
                    "No open data channel, message not sent".to_owned(),
                ));
            }
        }
        Ok(outcome)
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            local_id: self.registry.local_id().cloned(),
            status: self.status.clone(),
            sharing: self.sharing,
            peers: self.registry.snapshot(),
            chat_log: self.chat_log.clone(),
            connections: self.peers.phases(),
            open_channels: self.channels.keys(),
        }
    }

    /// True when the relay addressed a message to someone else.
    fn misaddressed(&self, target: &ParticipantId) -> bool {
        self.registry
            .local_id()
            .is_some_and(|local| local != target)
    }

    async fn handle_relay_event(&mut self, event: RelayEvent) {
        debug!("Handling relay event '{}'", event.name());

        match event {
            RelayEvent::Welcome { participant_id } => {
                self.peers.set_local_id(participant_id.clone());
                self.registry.set_local_id(participant_id.clone());
                self.set_status(format!("Connected as {}", participant_id.short()));
                if self.sharing {
                    self.call_known_peers().await;
                }
            }

            RelayEvent::UserConnected(id) => {
                if self.registry.local_id() == Some(&id) {
                    return;
                }
                if self.registry.insert(id.clone()) {
                    self.peers_changed();
                }
                if self.sharing
                    && !self.called.contains(&id)
                    && self.peers.initiate_call(&id).await
                {
                    self.called.insert(id);
                }
            }

            RelayEvent::UserDisconnected(id) => {
                self.called.remove(&id);
                if self.registry.remove(&id) {
                    self.peers_changed();
                }
            }

            RelayEvent::AllUsers(ids) => {
                self.registry.replace_ids(ids);
                self.peers_changed();
                if self.sharing {
                    self.call_known_peers().await;
                }
            }

            RelayEvent::UpdateUserList(list) => {
                self.registry.replace_all(list);
                self.peers_changed();
                if self.sharing {
                    self.call_known_peers().await;
                }
            }

            RelayEvent::Offer {
                target,
                caller_id,
                sdp,
            } => {
                if self.misaddressed(&target) || self.registry.local_id() == Some(&caller_id) {
                    debug!("Dropping offer for {} from {}", target, caller_id);
                    return;
                }
                self.peers.accept_offer(&caller_id, sdp).await;
            }

            RelayEvent::Answer { target, sdp, from } => {
                if self.misaddressed(&target) {
                    debug!("Dropping answer addressed to {}", target);
                    return;
                }
                self.peers.accept_answer(from.as_ref(), sdp).await;
            }

            RelayEvent::IceCandidate {
                target,
                candidate,
                from,
            } => {
                if self.misaddressed(&target) {
                    debug!("Dropping candidate addressed to {}", target);
                    return;
                }
                self.peers
                    .add_remote_candidate(from.as_ref(), &candidate)
                    .await;
            }
        }
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::CandidateGenerated(id, candidate) => {
                self.signaling.send_ice(id, candidate).await;
            }

            TransportEvent::ConnectivityChanged(id, state) => {
                self.set_status(format!("{}: {}", id.short(), state));
                if matches!(
                    state,
                    RTCIceConnectionState::Failed | RTCIceConnectionState::Closed
                ) {
                    self.drop_link(&id).await;
                }
            }

            TransportEvent::RemoteTrack(participant, track) => {
                info!("Receiving {} from {}", track.kind(), participant);
                self.emit(SessionEvent::RemoteTrack { participant, track });
            }

            TransportEvent::ChannelOpened(key, channel) => {
                let sink: Arc<dyn FrameSink> = channel;
                self.channels.insert(key.clone(), sink);
                self.inbound.entry(key.clone()).or_default();
                self.set_status(format!("Channel open with {}", key.participant.short()));
            }

            TransportEvent::ChannelMessage(key, frame) => {
                let transfer = self.inbound.entry(key.clone()).or_default();
                match transfer.on_frame(frame) {
                    Ok(Some(Delivery::Chat(text))) => {
                        let line = ChatLine {
                            author: ChatAuthor::Remote(key.participant.clone()),
                            text,
                        };
                        self.chat_log.push(line.clone());
                        self.emit(SessionEvent::Chat(line));
                    }
                    Ok(Some(Delivery::File(file))) => {
                        info!(
                            "Received '{}' ({} bytes) from {}",
                            file.name,
                            file.len(),
                            key.participant
                        );
                        self.set_status(format!(
                            "Received '{}' from {}",
                            file.name,
                            key.participant.short()
                        ));
                        self.emit(SessionEvent::FileReceived {
                            from: key.participant,
                            file,
                        });
                    }
                    Ok(None) => {}
                    Err(e) => warn!("Bad frame on {}: {:?}", key, e),
                }
            }

            TransportEvent::ChannelClosed(key) => {
                // A replacement channel may already sit under this key.
                if self.channels.remove_if_closed(&key) {
                    self.inbound.remove(&key);
                } else {
                    debug!("Ignoring close of a stale channel on {}", key);
                }
            }
        }
    }

    /// Closes the link to `id` and forgets its channels and partial transfers.
    async fn drop_link(&mut self, id: &ParticipantId) {
        self.peers.close_link(id).await;
        self.channels.remove_participant(id);
        self.inbound.retain(|key, _| &key.participant != id);
    }
}
