use crate::media::LocalMedia;
use crate::signaling::SignalingOutput;
use crate::transport::connection_wrapper::ConnectionWrapper;
use crate::transport::signaling_phase::SignalingPhase;
use crate::transport::transport_config::TransportConfig;
use crate::transport::transport_event::TransportEvent;
use anyhow::{Context, Result};
use meshcast_core::{IceCandidate, ParticipantId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Owns one `ConnectionWrapper` per remote participant and runs the
/// offer/answer/candidate exchange for them.
///
/// Nothing here is fatal: every failure is logged and the affected link is
/// left as it was.
pub struct PeerManager {
    local_id: Option<ParticipantId>,
    links: BTreeMap<ParticipantId, ConnectionWrapper>,
    config: TransportConfig,
    channel_label: String,
    transport_tx: mpsc::Sender<TransportEvent>,
    signaling: Arc<dyn SignalingOutput>,
    local_media: Option<LocalMedia>,
}

impl PeerManager {
    pub fn new(
        config: TransportConfig,
        channel_label: impl Into<String>,
        transport_tx: mpsc::Sender<TransportEvent>,
        signaling: Arc<dyn SignalingOutput>,
    ) -> Self {
        Self {
            local_id: None,
            links: BTreeMap::new(),
            config,
            channel_label: channel_label.into(),
            transport_tx,
            signaling,
            local_media: None,
        }
    }

    pub fn set_local_id(&mut self, id: ParticipantId) {
        self.local_id = Some(id);
    }

    pub fn local_id(&self) -> Option<&ParticipantId> {
        self.local_id.as_ref()
    }

    pub fn attach_media(&mut self, media: LocalMedia) {
        self.local_media = Some(media);
    }

    pub fn has_media(&self) -> bool {
        self.local_media.is_some()
    }

    /// Returns the link for `id`, creating it on first use.
    pub async fn get_or_create(&mut self, id: &ParticipantId) -> Result<&mut ConnectionWrapper> {
        if !self.links.contains_key(id) {
            let link =
                ConnectionWrapper::new(id.clone(), &self.config, self.transport_tx.clone()).await?;
            debug!("Created peer connection for {}", id);
            self.links.insert(id.clone(), link);
        }
        self.links
            .get_mut(id)
            .with_context(|| format!("Peer connection for {} vanished", id))
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&ConnectionWrapper> {
        self.links.get(id)
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.links.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn phase(&self, id: &ParticipantId) -> Option<SignalingPhase> {
        self.links.get(id).map(ConnectionWrapper::phase)
    }

    pub fn phases(&self) -> Vec<(ParticipantId, SignalingPhase)> {
        self.links
            .iter()
            .map(|(id, link)| (id.clone(), link.phase()))
            .collect()
    }

    /// Places a call to `id`: attaches local tracks and the outbound channel
    /// (each once per link), then sends an offer. Returns whether an offer went out.
    pub async fn initiate_call(&mut self, id: &ParticipantId) -> bool {
        let Some(local_id) = self.local_id.clone() else {
            warn!("Not calling {}: local id unknown", id);
            return false;
        };
        let Some(media) = self.local_media.clone() else {
            warn!("Not calling {}: no local media", id);
            return false;
        };

        match self.place_call(id, &local_id, &media).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to call {}: {:?}", id, e);
                false
            }
        }
    }

    async fn place_call(
        &mut self,
        id: &ParticipantId,
        local_id: &ParticipantId,
        media: &LocalMedia,
    ) -> Result<()> {
        let label = self.channel_label.clone();
        let event_tx = self.transport_tx.clone();
        let signaling = Arc::clone(&self.signaling);

        let link = self.get_or_create(id).await?;
        link.attach_media(media).await?;
        link.open_outbound_channel(&label, event_tx).await?;
        let offer = link.create_offer().await?;

        info!("Sending offer to {}", id);
        signaling.send_offer(id.clone(), local_id.clone(), offer).await;
        Ok(())
    }

    /// Answers an offer from `from`, creating the link if needed.
    pub async fn accept_offer(&mut self, from: &ParticipantId, sdp: String) -> bool {
        let signaling = Arc::clone(&self.signaling);
        let result: Result<String> = async {
            let link = self.get_or_create(from).await?;
            link.set_remote_offer(sdp)
                .await
                .context("Failed to apply remote offer")?;
            link.create_answer().await.context("Failed to create answer")
        }
        .await;

        match result {
            Ok(answer) => {
                info!("Answering offer from {}", from);
                signaling.send_answer(from.clone(), answer).await;
                true
            }
            Err(e) => {
                error!("Failed to accept offer from {}: {:?}", from, e);
                false
            }
        }
    }

    /// Picks the link an answer belongs to. Falls back to the first link
    /// still waiting on an answer when the sender is unknown.
    fn resolve_answer_target(&self, from: Option<&ParticipantId>) -> Option<ParticipantId> {
        if let Some(id) = from.filter(|id| self.links.contains_key(*id)) {
            return Some(id.clone());
        }

        let fallback = self
            .links
            .iter()
            .find(|(_, link)| link.phase() == SignalingPhase::HaveLocalOffer)
            .map(|(id, _)| id.clone());
        if let Some(id) = &fallback {
            debug!(
                "Answer sender {:?} unknown, applying to {} (awaiting answer)",
                from, id
            );
        }
        fallback
    }

    pub async fn accept_answer(&self, from: Option<&ParticipantId>, sdp: String) -> bool {
        let Some(target) = self.resolve_answer_target(from) else {
            warn!("No connection to apply answer from {:?} to", from);
            return false;
        };
        let Some(link) = self.links.get(&target) else {
            return false;
        };

        match link.set_remote_answer(sdp).await {
            Ok(()) => {
                info!("Applied answer for {}", target);
                true
            }
            Err(e) => {
                error!("Failed to apply answer for {}: {:?}", target, e);
                false
            }
        }
    }

    /// Applies a remote candidate to its link, or to every link when the
    /// sender cannot be resolved. Returns how many links accepted it.
    pub async fn add_remote_candidate(
        &self,
        from: Option<&ParticipantId>,
        candidate: &IceCandidate,
    ) -> usize {
        if let Some(link) = from.and_then(|id| self.links.get(id)) {
            return match link.add_ice_candidate(candidate).await {
                Ok(()) => 1,
                Err(e) => {
                    warn!("Failed to add candidate for {}: {:?}", link.participant, e);
                    0
                }
            };
        }

        debug!(
            "Candidate sender {:?} unknown, trying all {} connections",
            from,
            self.links.len()
        );
        let mut applied = 0;
        for (id, link) in &self.links {
            match link.add_ice_candidate(candidate).await {
                Ok(()) => applied += 1,
                Err(e) => debug!("Candidate rejected by {}: {:?}", id, e),
            }
        }
        applied
    }

    pub async fn close_link(&mut self, id: &ParticipantId) -> bool {
        let Some(link) = self.links.remove(id) else {
            return false;
        };
        if let Err(e) = link.close().await {
            warn!("Failed to close connection to {}: {:?}", id, e);
        }
        info!("Closed connection to {}", id);
        true
    }

    pub async fn close_all(&mut self) {
        let ids: Vec<ParticipantId> = self.links.keys().cloned().collect();
        for id in ids {
            self.close_link(&id).await;
        }
    }
}
