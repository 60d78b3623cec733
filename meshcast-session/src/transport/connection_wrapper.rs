use crate::media::LocalMedia;
use crate::transport::signaling_phase::SignalingPhase;
use crate::transport::transport_config::TransportConfig;
use crate::transport::transport_event::TransportEvent;
use anyhow::{Context, Result};
use meshcast_core::{ChannelDirection, ChannelKey, Frame, IceCandidate, ParticipantId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_init::RTCDataChannelInit;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_remote::TrackRemote;

/// One peer connection to one remote participant.
pub struct ConnectionWrapper {
    pub participant: ParticipantId,
    pub peer_connection: Arc<RTCPeerConnection>,
    media_attached: bool,
    outbound_channel: bool,
}

impl ConnectionWrapper {
    /// Builds the connection and routes every callback into `event_tx`,
    /// tagged with the remote participant id.
    pub async fn new(
        participant: ParticipantId,
        config: &TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = if config.ice_servers.is_empty() {
            Vec::new()
        } else {
            vec![RTCIceServer {
                urls: config.ice_servers.clone(),
                credential: String::new(),
                username: String::new(),
            }]
        };
        let rtc_config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        let ice_tx = event_tx.clone();
        let uid_ice = participant.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let uid = uid_ice.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let candidate = IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                    username_fragment: init.username_fragment,
                };
                let _ = tx
                    .send(TransportEvent::CandidateGenerated(uid, candidate))
                    .await;
            })
        }));

        let state_tx = event_tx.clone();
        let uid_state = participant.clone();
        peer_connection.on_ice_connection_state_change(Box::new(
            move |s: RTCIceConnectionState| {
                let tx = state_tx.clone();
                let uid = uid_state.clone();

                Box::pin(async move {
                    info!("ICE connection state for {}: {}", uid, s);
                    let _ = tx.send(TransportEvent::ConnectivityChanged(uid, s)).await;
                })
            },
        ));

        let track_tx = event_tx.clone();
        let uid_track = participant.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                let uid = uid_track.clone();

                Box::pin(async move {
                    debug!("Remote {} track from {}", track.kind(), uid);
                    let _ = tx.send(TransportEvent::RemoteTrack(uid, track)).await;
                })
            },
        ));

        let dc_tx = event_tx.clone();
        let uid_dc = participant.clone();
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = dc_tx.clone();
            let key = ChannelKey::new(uid_dc.clone(), ChannelDirection::Inbound);

            Box::pin(async move {
                debug!("Remote opened data channel '{}' ({})", dc.label(), key);
                bind_data_channel(dc, key, tx);
            })
        }));

        Ok(Self {
            participant,
            peer_connection,
            media_attached: false,
            outbound_channel: false,
        })
    }

    pub fn media_attached(&self) -> bool {
        self.media_attached
    }

    pub fn has_outbound_channel(&self) -> bool {
        self.outbound_channel
    }

    /// Adds the local tracks. Calling it again on the same connection is a no-op.
    pub async fn attach_media(&mut self, media: &LocalMedia) -> Result<()> {
        if self.media_attached {
            return Ok(());
        }
        for track in &media.tracks {
            let rtp_sender = self
                .peer_connection
                .add_track(Arc::clone(track))
                .await
                .context("Failed to add local track")?;

            // RTCP has to be drained for the interceptors to work.
            tokio::spawn(async move {
                let mut rtcp_buf = vec![0u8; 1500];
                while rtp_sender.read(&mut rtcp_buf).await.is_ok() {}
            });
        }
        self.media_attached = true;
        Ok(())
    }

    /// Creates the ordered locally-initiated channel. Only one per connection.
    pub async fn open_outbound_channel(
        &mut self,
        label: &str,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<()> {
        if self.outbound_channel {
            return Ok(());
        }
        let init = RTCDataChannelInit {
            ordered: Some(true),
            ..Default::default()
        };
        let dc = self
            .peer_connection
            .create_data_channel(label, Some(init))
            .await
            .context("Failed to create data channel")?;

        let key = ChannelKey::new(self.participant.clone(), ChannelDirection::Outbound);
        bind_data_channel(dc, key, event_tx);
        self.outbound_channel = true;
        Ok(())
    }

    /// Creates an offer and applies it as the local description.
    pub async fn create_offer(&self) -> Result<String> {
        let offer = self.peer_connection.create_offer(None).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;
        Ok(offer.sdp)
    }

    pub async fn set_remote_offer(&self, sdp: String) -> Result<()> {
        let desc = RTCSessionDescription::offer(sdp)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    pub async fn set_remote_answer(&self, sdp: String) -> Result<()> {
        let desc = RTCSessionDescription::answer(sdp)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    /// Creates an answer and applies it as the local description.
    pub async fn create_answer(&self) -> Result<String> {
        let answer = self.peer_connection.create_answer(None).await?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await?;
        Ok(answer.sdp)
    }

    pub async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate.clone(),
            sdp_mid: candidate.sdp_mid.clone(),
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: candidate.username_fragment.clone(),
        };
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .context("Failed to add ICE candidate")?;
        Ok(())
    }

    pub fn phase(&self) -> SignalingPhase {
        self.peer_connection.signaling_state().into()
    }

    pub fn ice_state(&self) -> RTCIceConnectionState {
        self.peer_connection.ice_connection_state()
    }

    pub async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

/// Forwards open/message/close of `dc` to the session loop under `key`.
pub fn bind_data_channel(
    dc: Arc<RTCDataChannel>,
    key: ChannelKey,
    tx: mpsc::Sender<TransportEvent>,
) {
    let open_tx = tx.clone();
    let open_key = key.clone();
    let open_dc = Arc::clone(&dc);
    dc.on_open(Box::new(move || {
        let tx = open_tx.clone();
        let key = open_key.clone();
        let channel = Arc::clone(&open_dc);

        Box::pin(async move {
            info!("Data channel {} open", key);
            let _ = tx.send(TransportEvent::ChannelOpened(key, channel)).await;
        })
    }));

    let msg_tx = tx.clone();
    let msg_key = key.clone();
    dc.on_message(Box::new(move |msg: DataChannelMessage| {
        let tx = msg_tx.clone();
        let key = msg_key.clone();

        Box::pin(async move {
            match Frame::from_parts(msg.is_string, msg.data) {
                Ok(frame) => {
                    let _ = tx.send(TransportEvent::ChannelMessage(key, frame)).await;
                }
                Err(e) => warn!("Dropping frame on {}: {:?}", key, e),
            }
        })
    }));

    let close_key = key;
    dc.on_close(Box::new(move || {
        let tx = tx.clone();
        let key = close_key.clone();

        Box::pin(async move {
            debug!("Data channel {} closed", key);
            let _ = tx.send(TransportEvent::ChannelClosed(key)).await;
        })
    }));
}
