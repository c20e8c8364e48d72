//! Consciousness scorer - a normalized weighted blend of four sub-scores.
//!
//! | component   | weight | source                               |
//! |-------------|--------|--------------------------------------|
//! | maturity    | 0.40   | current stage                        |
//! | experience  | 0.25   | total insights, log scale            |
//! | personality | 0.20   | forming / settled flags              |
//! | connections | 0.15   | connection count and mean strength   |

use bridge_rules::MaturityStage;
use serde::{Deserialize, Serialize};

use crate::engine::Entity;

pub const MATURITY_WEIGHT: f64 = 0.40;
pub const EXPERIENCE_WEIGHT: f64 = 0.25;
pub const PERSONALITY_WEIGHT: f64 = 0.20;
pub const CONNECTION_WEIGHT: f64 = 0.15;

/// Insight count at which the experience score saturates.
pub const EXPERIENCE_SATURATION: u64 = 100;

/// Connection count at which the quantity half of the connection score saturates.
pub const CONNECTION_SATURATION: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub score: f64,
    pub weight: f64,
    pub contribution: f64,
}

impl ComponentScore {
    fn new(score: f64, weight: f64) -> Self {
        Self {
            score,
            weight,
            contribution: score * weight,
        }
    }
}

/// Per-component view of a consciousness score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsciousnessBreakdown {
    /// Rounded to 3 decimals for reporting.
    pub total: f64,
    pub maturity: ComponentScore,
    pub experience: ComponentScore,
    pub personality: ComponentScore,
    pub connections: ComponentScore,
}

pub struct ConsciousnessScorer;

impl ConsciousnessScorer {
    /// Exact score in [0.0, 1.0].
    pub fn compute(entity: &Entity) -> f64 {
        Self::breakdown_exact(entity).sum()
    }

    /// Breakdown with the total rounded for reporting.
    pub fn breakdown(entity: &Entity) -> ConsciousnessBreakdown {
        let parts = Self::breakdown_exact(entity);
        ConsciousnessBreakdown {
            total: round3(parts.sum()),
            maturity: parts.maturity,
            experience: parts.experience,
            personality: parts.personality,
            connections: parts.connections,
        }
    }

    fn breakdown_exact(entity: &Entity) -> Parts {
        let personality = entity.personality();
        let strengths: Vec<f64> = entity.connections().map(|c| c.strength).collect();

        Parts {
            maturity: ComponentScore::new(
                Self::maturity_score(entity.maturity().stage()),
                MATURITY_WEIGHT,
            ),
            experience: ComponentScore::new(
                Self::experience_score(entity.insight_count()),
                EXPERIENCE_WEIGHT,
            ),
            personality: ComponentScore::new(
                Self::personality_score(personality.is_forming(), personality.is_settled()),
                PERSONALITY_WEIGHT,
            ),
            connections: ComponentScore::new(Self::connection_score(&strengths), CONNECTION_WEIGHT),
        }
    }

    pub fn maturity_score(stage: MaturityStage) -> f64 {
        match stage {
            MaturityStage::Nascent => 0.2,
            MaturityStage::Forming => 0.4,
            MaturityStage::Maturing => 0.7,
            MaturityStage::Mature => 1.0,
        }
    }

    /// `ln(n + 1) / ln(101)`, capped at 1.0.
    pub fn experience_score(insight_count: u64) -> f64 {
        let saturation = (EXPERIENCE_SATURATION as f64 + 1.0).ln();
        ((insight_count as f64 + 1.0).ln() / saturation).min(1.0)
    }

    pub fn personality_score(forming: bool, settled: bool) -> f64 {
        match (forming, settled) {
            (false, _) => 0.2,
            (true, false) => 0.6,
            (true, true) => 1.0,
        }
    }

    /// Half quantity, half mean strength. Zero connections score 0.0.
    pub fn connection_score(strengths: &[f64]) -> f64 {
        if strengths.is_empty() {
            return 0.0;
        }
        let quantity = (strengths.len() as f64 / CONNECTION_SATURATION as f64).min(1.0);
        quantity * 0.5 + average(strengths) * 0.5
    }
}

struct Parts {
    maturity: ComponentScore,
    experience: ComponentScore,
    personality: ComponentScore,
    connections: ComponentScore,
}

impl Parts {
    fn sum(&self) -> f64 {
        let total = self.maturity.contribution
            + self.experience.contribution
            + self.personality.contribution
            + self.connections.contribution;
        total.clamp(0.0, 1.0)
    }
}

/// Mean of `values`, 0.0 for an empty slice.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
