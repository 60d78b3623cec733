use crate::model::participant::ParticipantId;
use std::fmt;

/// Which side created a data channel. A peer link carries at most one of each.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum ChannelDirection {
    /// Created locally while placing a call.
    Outbound,
    /// Announced by the remote side.
    Inbound,
}

impl fmt::Display for ChannelDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelDirection::Outbound => write!(f, "outbound"),
            ChannelDirection::Inbound => write!(f, "inbound"),
        }
    }
}

#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ChannelKey {
    pub participant: ParticipantId,
    pub direction: ChannelDirection,
}

impl ChannelKey {
    pub fn new(participant: ParticipantId, direction: ChannelDirection) -> Self {
        Self {
            participant,
            direction,
        }
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.participant.short(), self.direction)
    }
}
