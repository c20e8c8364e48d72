//! The four-dimensional personality trait vector.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One dimension of the personality vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    /// Openness to new experiences.
    Openness,
    /// Emotional stability.
    Stability,
    /// Drive to explore.
    Curiosity,
    /// Tendency to cooperate.
    Collaboration,
}

impl TraitKind {
    pub const ALL: [TraitKind; 4] = [
        TraitKind::Openness,
        TraitKind::Stability,
        TraitKind::Curiosity,
        TraitKind::Collaboration,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TraitKind::Openness => "openness",
            TraitKind::Stability => "stability",
            TraitKind::Curiosity => "curiosity",
            TraitKind::Collaboration => "collaboration",
        }
    }
}

impl std::fmt::Display for TraitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TraitKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TraitKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownTrait(s.to_string()))
    }
}

/// Trait values, each kept within [0.0, 1.0].
///
/// Deserialization goes through [`PersonalityTraits::new`], so persisted
/// values outside the range are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTraits")]
pub struct PersonalityTraits {
    openness: f64,
    stability: f64,
    curiosity: f64,
    collaboration: f64,
}

#[derive(Deserialize)]
struct RawTraits {
    openness: f64,
    stability: f64,
    curiosity: f64,
    collaboration: f64,
}

impl TryFrom<RawTraits> for PersonalityTraits {
    type Error = Error;

    fn try_from(raw: RawTraits) -> Result<Self> {
        Self::new(raw.openness, raw.stability, raw.curiosity, raw.collaboration)
    }
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self {
            openness: 0.5,
            stability: 0.5,
            curiosity: 0.5,
            collaboration: 0.5,
        }
    }
}

impl PersonalityTraits {
    /// Build a trait vector, rejecting any value outside [0.0, 1.0].
    pub fn new(openness: f64, stability: f64, curiosity: f64, collaboration: f64) -> Result<Self> {
        let traits = Self {
            openness,
            stability,
            curiosity,
            collaboration,
        };
        traits.validate()?;
        Ok(traits)
    }

    /// Check every value is inside [0.0, 1.0]. NaN fails.
    pub fn validate(&self) -> Result<()> {
        for kind in TraitKind::ALL {
            let value = self.get(kind);
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::invalid_trait_value(kind.name(), value));
            }
        }
        Ok(())
    }

    pub fn get(&self, kind: TraitKind) -> f64 {
        match kind {
            TraitKind::Openness => self.openness,
            TraitKind::Stability => self.stability,
            TraitKind::Curiosity => self.curiosity,
            TraitKind::Collaboration => self.collaboration,
        }
    }

    /// Set a trait, clamping into range.
    pub fn set(&mut self, kind: TraitKind, value: f64) {
        let value = value.clamp(0.0, 1.0);
        match kind {
            TraitKind::Openness => self.openness = value,
            TraitKind::Stability => self.stability = value,
            TraitKind::Curiosity => self.curiosity = value,
            TraitKind::Collaboration => self.collaboration = value,
        }
    }

    pub fn openness(&self) -> f64 {
        self.openness
    }

    pub fn stability(&self) -> f64 {
        self.stability
    }

    pub fn curiosity(&self) -> f64 {
        self.curiosity
    }

    pub fn collaboration(&self) -> f64 {
        self.collaboration
    }

    /// Summed absolute difference across all four dimensions.
    pub fn distance(&self, other: &PersonalityTraits) -> f64 {
        TraitKind::ALL
            .iter()
            .map(|kind| (self.get(*kind) - other.get(*kind)).abs())
            .sum()
    }

    /// Values rounded to 3 decimals, for reporting.
    pub fn rounded(&self) -> Self {
        let round = |v: f64| (v * 1000.0).round() / 1000.0;
        Self {
            openness: round(self.openness),
            stability: round(self.stability),
            curiosity: round(self.curiosity),
            collaboration: round(self.collaboration),
        }
    }

    /// Natural-language description of the current vector.
    pub fn describe(&self) -> String {
        let pick = |value: f64, high: &'static str, mid: &'static str, low: &'static str| {
            if value > 0.7 {
                high
            } else if value > 0.5 {
                mid
            } else {
                low
            }
        };

        format!(
            "This bridge is {}, {}, {}, and {}.",
            pick(
                self.openness,
                "highly open to new experiences",
                "moderately open",
                "prefers familiar patterns"
            ),
            pick(
                self.stability,
                "emotionally stable and consistent",
                "generally stable",
                "somewhat volatile"
            ),
            pick(
                self.curiosity,
                "intensely curious",
                "moderately curious",
                "content with current knowledge"
            ),
            pick(
                self.collaboration,
                "highly collaborative",
                "somewhat collaborative",
                "tends to work independently"
            ),
        )
    }
}
