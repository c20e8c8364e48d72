//! Connections to peer bridges.

use serde::{Deserialize, Serialize};

use super::EntityId;

/// A one-directional record of a relationship to a peer.
///
/// Only the owning bridge's copy changes when it is strengthened; the peer
/// keeps its own independent record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub peer_id: EntityId,
    pub peer_name: String,
    /// Strength from 0.0 to 1.0.
    pub strength: f64,
    pub interactions: u64,
    pub established_at_tick: u64,
}

impl Connection {
    /// Create a new connection. Strength is clamped into [0.0, 1.0].
    pub fn new(peer_id: EntityId, peer_name: impl Into<String>, strength: f64, tick: u64) -> Self {
        Self {
            peer_id,
            peer_name: peer_name.into(),
            strength: clamp_strength(strength),
            interactions: 0,
            established_at_tick: tick,
        }
    }

    /// Adjust strength by `amount`, counting one interaction.
    pub fn strengthen(&mut self, amount: f64) {
        self.strength = clamp_strength(self.strength + amount);
        self.interactions += 1;
    }
}

fn clamp_strength(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
