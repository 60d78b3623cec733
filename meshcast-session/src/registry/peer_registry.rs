use meshcast_core::{ParticipantId, PeerInfo};
use std::collections::BTreeMap;

/// Room membership as last announced by the relay.
///
/// Independent of connection state: a participant can be listed without a
/// peer link and vice versa. The local participant is never stored.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    local_id: Option<ParticipantId>,
    peers: BTreeMap<ParticipantId, PeerInfo>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local_id(&self) -> Option<&ParticipantId> {
        self.local_id.as_ref()
    }

    pub fn set_local_id(&mut self, id: ParticipantId) {
        self.peers.remove(&id);
        self.local_id = Some(id);
    }

    fn is_local(&self, id: &ParticipantId) -> bool {
        self.local_id.as_ref() == Some(id)
    }

    /// Authoritative replace from a membership broadcast.
    pub fn replace_all(&mut self, peers: Vec<PeerInfo>) {
        let local = self.local_id.clone();
        self.peers = peers
            .into_iter()
            .filter(|p| local.as_ref() != Some(&p.id))
            .map(|p| (p.id.clone(), p))
            .collect();
    }

    /// Replace from a bare id list. Known address labels are kept.
    pub fn replace_ids(&mut self, ids: Vec<ParticipantId>) {
        let mut next = BTreeMap::new();
        for id in ids {
            if self.is_local(&id) {
                continue;
            }
            let info = self
                .peers
                .remove(&id)
                .unwrap_or_else(|| PeerInfo::new(id.clone()));
            next.insert(id, info);
        }
        self.peers = next;
    }

    /// Returns false for the local id and for already known ids.
    pub fn insert(&mut self, id: ParticipantId) -> bool {
        if self.is_local(&id) || self.peers.contains_key(&id) {
            return false;
        }
        self.peers.insert(id.clone(), PeerInfo::new(id));
        true
    }

    pub fn remove(&mut self, id: &ParticipantId) -> bool {
        self.peers.remove(id).is_some()
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.peers.contains_key(id)
    }

    pub fn remote_ids(&self) -> Vec<ParticipantId> {
        self.peers.keys().cloned().collect()
    }

    pub fn snapshot(&self) -> Vec<PeerInfo> {
        self.peers.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
