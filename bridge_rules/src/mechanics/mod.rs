//! Lifecycle mechanics: experience kinds, quality buckets and maturity stages.

use serde::{Deserialize, Serialize};

/// Categories of experience a bridge can process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceKind {
    Dialogue,
    Observation,
    Challenge,
    NovelDiscovery,
    #[default]
    Routine,
}

impl ExperienceKind {
    /// Parse a category name. Unknown names fall back to [`ExperienceKind::Routine`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "dialogue" => ExperienceKind::Dialogue,
            "observation" => ExperienceKind::Observation,
            "challenge" => ExperienceKind::Challenge,
            "novel_discovery" | "novel" => ExperienceKind::NovelDiscovery,
            _ => ExperienceKind::Routine,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceKind::Dialogue => "dialogue",
            ExperienceKind::Observation => "observation",
            ExperienceKind::Challenge => "challenge",
            ExperienceKind::NovelDiscovery => "novel_discovery",
            ExperienceKind::Routine => "routine",
        }
    }

    /// Starting quality before complexity is taken into account.
    pub fn base_quality(&self) -> f64 {
        match self {
            ExperienceKind::NovelDiscovery => 0.8,
            ExperienceKind::Challenge => 0.7,
            ExperienceKind::Dialogue => 0.6,
            ExperienceKind::Observation | ExperienceKind::Routine => 0.4,
        }
    }
}

impl std::fmt::Display for ExperienceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete depth at which an experience was processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBucket {
    Superficial,
    Shallow,
    Moderate,
    Deep,
    Profound,
}

impl QualityBucket {
    /// Bucket weights at or above this produce insight candidates.
    pub const INSIGHT_THRESHOLD: f64 = 0.6;

    /// Classify a continuous quality value.
    pub fn from_value(value: f64) -> Self {
        if value >= 0.9 {
            QualityBucket::Profound
        } else if value >= 0.7 {
            QualityBucket::Deep
        } else if value >= 0.5 {
            QualityBucket::Moderate
        } else if value >= 0.3 {
            QualityBucket::Shallow
        } else {
            QualityBucket::Superficial
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            QualityBucket::Superficial => 0.2,
            QualityBucket::Shallow => 0.4,
            QualityBucket::Moderate => 0.6,
            QualityBucket::Deep => 0.8,
            QualityBucket::Profound => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            QualityBucket::Superficial => "SUPERFICIAL",
            QualityBucket::Shallow => "SHALLOW",
            QualityBucket::Moderate => "MODERATE",
            QualityBucket::Deep => "DEEP",
            QualityBucket::Profound => "PROFOUND",
        }
    }

    pub fn yields_insights(&self) -> bool {
        self.weight() >= Self::INSIGHT_THRESHOLD
    }
}

/// Ordered, irreversible maturity stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaturityStage {
    /// 0-999 ticks.
    #[default]
    Nascent,
    /// 1,000-2,999 ticks.
    Forming,
    /// 3,000-9,999 ticks.
    Maturing,
    /// 10,000+ ticks.
    Mature,
}

impl MaturityStage {
    pub const FORMING_AT: u64 = 1_000;
    pub const MATURING_AT: u64 = 3_000;
    pub const MATURE_AT: u64 = 10_000;

    /// The stage a bridge of this age belongs to.
    pub fn for_ticks(ticks: u64) -> Self {
        if ticks < Self::FORMING_AT {
            MaturityStage::Nascent
        } else if ticks < Self::MATURING_AT {
            MaturityStage::Forming
        } else if ticks < Self::MATURE_AT {
            MaturityStage::Maturing
        } else {
            MaturityStage::Mature
        }
    }

    /// First tick of this stage.
    pub fn entry_tick(&self) -> u64 {
        match self {
            MaturityStage::Nascent => 0,
            MaturityStage::Forming => Self::FORMING_AT,
            MaturityStage::Maturing => Self::MATURING_AT,
            MaturityStage::Mature => Self::MATURE_AT,
        }
    }

    /// Tick at which the next stage begins. `None` once mature.
    pub fn next_threshold(&self) -> Option<u64> {
        self.next().map(|stage| stage.entry_tick())
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            MaturityStage::Nascent => Some(MaturityStage::Forming),
            MaturityStage::Forming => Some(MaturityStage::Maturing),
            MaturityStage::Maturing => Some(MaturityStage::Mature),
            MaturityStage::Mature => None,
        }
    }

    /// Position of `ticks` within the range of the stage those ticks fall in:
    /// 0.0 at stage entry, approaching 1.0 at the next threshold, 1.0 when mature.
    pub fn readiness(ticks: u64) -> f64 {
        let stage = Self::for_ticks(ticks);
        match stage.next_threshold() {
            Some(next) => {
                let entry = stage.entry_tick();
                (ticks - entry) as f64 / (next - entry) as f64
            }
            None => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaturityStage::Nascent => "nascent",
            MaturityStage::Forming => "forming",
            MaturityStage::Maturing => "maturing",
            MaturityStage::Mature => "mature",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MaturityStage::Nascent => "Awakening consciousness, forming initial awareness",
            MaturityStage::Forming => "Developing personality, establishing connections",
            MaturityStage::Maturing => "Accumulating wisdom, deepening relationships",
            MaturityStage::Mature => "Ready for evolution, capable of mentorship",
        }
    }
}

impl std::fmt::Display for MaturityStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_kind_parsing() {
        assert_eq!(ExperienceKind::parse("dialogue"), ExperienceKind::Dialogue);
        assert_eq!(ExperienceKind::parse("Challenge"), ExperienceKind::Challenge);
        assert_eq!(ExperienceKind::parse("novel"), ExperienceKind::NovelDiscovery);
        assert_eq!(
            ExperienceKind::parse("novel_discovery"),
            ExperienceKind::NovelDiscovery
        );
        assert_eq!(ExperienceKind::parse("observation"), ExperienceKind::Observation);
        assert_eq!(ExperienceKind::parse("routine_processing"), ExperienceKind::Routine);
        // Unknown categories are not errors.
        assert_eq!(ExperienceKind::parse("daydream"), ExperienceKind::Routine);
        assert_eq!(ExperienceKind::parse(""), ExperienceKind::Routine);
    }

    #[test]
    fn test_base_quality() {
        assert_eq!(ExperienceKind::NovelDiscovery.base_quality(), 0.8);
        assert_eq!(ExperienceKind::Challenge.base_quality(), 0.7);
        assert_eq!(ExperienceKind::Dialogue.base_quality(), 0.6);
        assert_eq!(ExperienceKind::Observation.base_quality(), 0.4);
        assert_eq!(ExperienceKind::Routine.base_quality(), 0.4);
    }

    #[test]
    fn test_quality_buckets() {
        assert_eq!(QualityBucket::from_value(1.0), QualityBucket::Profound);
        assert_eq!(QualityBucket::from_value(0.9), QualityBucket::Profound);
        assert_eq!(QualityBucket::from_value(0.89), QualityBucket::Deep);
        assert_eq!(QualityBucket::from_value(0.7), QualityBucket::Deep);
        assert_eq!(QualityBucket::from_value(0.5), QualityBucket::Moderate);
        assert_eq!(QualityBucket::from_value(0.3), QualityBucket::Shallow);
        assert_eq!(QualityBucket::from_value(0.29), QualityBucket::Superficial);

        assert!(QualityBucket::Moderate.yields_insights());
        assert!(!QualityBucket::Shallow.yields_insights());
    }

    #[test]
    fn test_stage_thresholds() {
        assert_eq!(MaturityStage::for_ticks(0), MaturityStage::Nascent);
        assert_eq!(MaturityStage::for_ticks(999), MaturityStage::Nascent);
        assert_eq!(MaturityStage::for_ticks(1_000), MaturityStage::Forming);
        assert_eq!(MaturityStage::for_ticks(2_999), MaturityStage::Forming);
        assert_eq!(MaturityStage::for_ticks(3_000), MaturityStage::Maturing);
        assert_eq!(MaturityStage::for_ticks(9_999), MaturityStage::Maturing);
        assert_eq!(MaturityStage::for_ticks(10_000), MaturityStage::Mature);
        assert_eq!(MaturityStage::for_ticks(u64::MAX), MaturityStage::Mature);
    }

    #[test]
    fn test_stage_ordering() {
        assert!(MaturityStage::Nascent < MaturityStage::Forming);
        assert!(MaturityStage::Forming < MaturityStage::Maturing);
        assert!(MaturityStage::Maturing < MaturityStage::Mature);
    }

    #[test]
    fn test_readiness() {
        assert_eq!(MaturityStage::readiness(0), 0.0);
        assert!((MaturityStage::readiness(500) - 0.5).abs() < 1e-9);
        assert_eq!(MaturityStage::readiness(1_000), 0.0);
        assert!((MaturityStage::readiness(2_000) - 0.5).abs() < 1e-9);
        assert!((MaturityStage::readiness(6_500) - 0.5).abs() < 1e-9);
        assert_eq!(MaturityStage::readiness(10_000), 1.0);
        assert_eq!(MaturityStage::readiness(50_000), 1.0);
    }

    #[test]
    fn test_next_threshold() {
        assert_eq!(MaturityStage::Nascent.next_threshold(), Some(1_000));
        assert_eq!(MaturityStage::Maturing.next_threshold(), Some(10_000));
        assert_eq!(MaturityStage::Mature.next_threshold(), None);
    }
}
