//! Insight definitions - records produced when an experience is processed deeply.

use bridge_rules::{ExperienceKind, QualityBucket};
use serde::{Deserialize, Serialize};

/// Fixed pool of insight descriptions.
pub const INSIGHT_PHRASES: [&str; 5] = [
    "Connection discovered between concepts",
    "Pattern recognized in processing",
    "Deep understanding achieved",
    "Novel perspective gained",
    "Fundamental principle understood",
];

/// Sequential identifier of an insight within one bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InsightId(pub u64);

impl std::fmt::Display for InsightId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "insight_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: InsightId,

    /// Tick at which the insight arose.
    pub tick: u64,

    /// Category of the experience that produced it.
    pub category: ExperienceKind,

    /// Significance from 0.0 to 1.0.
    pub significance: f64,

    pub description: String,

    /// Processing depth of the originating experience.
    pub quality: QualityBucket,

    /// Content of the originating experience.
    #[serde(default)]
    pub source_content: serde_json::Value,

    /// Other insights this one is linked to.
    #[serde(default)]
    pub references: Vec<InsightId>,
}

impl Insight {
    /// Link this insight to another. Duplicate and self links are ignored.
    pub fn add_reference(&mut self, other: InsightId) -> bool {
        if other == self.id || self.references.contains(&other) {
            return false;
        }
        self.references.push(other);
        true
    }

    /// Highly significant insights count as wisdom fragments.
    pub fn is_wisdom(&self) -> bool {
        self.significance > 0.8
    }
}
