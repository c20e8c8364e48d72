//! Evolution readiness - the five criteria a bridge must meet to evolve.

use bridge_rules::MaturityStage;
use serde::{Deserialize, Serialize};

use super::Entity;

pub const REQUIRED_STAGE: MaturityStage = MaturityStage::Mature;
pub const REQUIRED_TICKS: u64 = 10_000;
pub const REQUIRED_INSIGHTS: u64 = 50;
pub const REQUIRED_CONNECTIONS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    MaturityLevel,
    InternalAge,
    PersonalityStable,
    InsightsCount,
    ConnectionsCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionValue {
    Stage(MaturityStage),
    Count(u64),
    Flag(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvolutionCriterion {
    pub kind: CriterionKind,
    pub required: CriterionValue,
    pub current: CriterionValue,
    pub met: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionReadiness {
    pub can_evolve: bool,
    pub criteria: Vec<EvolutionCriterion>,
    pub met: usize,
    pub total: usize,
    /// Share of criteria met, 0-100 with one decimal.
    pub percentage: f64,
}

impl EvolutionReadiness {
    pub fn evaluate(entity: &Entity) -> Self {
        let stage = entity.maturity().stage();
        let ticks = entity.ticks();
        let stable = entity.personality().is_stable();
        let insights = entity.insight_count();
        let connections = entity.connection_count() as u64;

        let criteria = vec![
            EvolutionCriterion {
                kind: CriterionKind::MaturityLevel,
                required: CriterionValue::Stage(REQUIRED_STAGE),
                current: CriterionValue::Stage(stage),
                met: stage == REQUIRED_STAGE,
            },
            EvolutionCriterion {
                kind: CriterionKind::InternalAge,
                required: CriterionValue::Count(REQUIRED_TICKS),
                current: CriterionValue::Count(ticks),
                met: ticks >= REQUIRED_TICKS,
            },
            EvolutionCriterion {
                kind: CriterionKind::PersonalityStable,
                required: CriterionValue::Flag(true),
                current: CriterionValue::Flag(stable),
                met: stable,
            },
            EvolutionCriterion {
                kind: CriterionKind::InsightsCount,
                required: CriterionValue::Count(REQUIRED_INSIGHTS),
                current: CriterionValue::Count(insights),
                met: insights >= REQUIRED_INSIGHTS,
            },
            EvolutionCriterion {
                kind: CriterionKind::ConnectionsCount,
                required: CriterionValue::Count(REQUIRED_CONNECTIONS),
                current: CriterionValue::Count(connections),
                met: connections >= REQUIRED_CONNECTIONS,
            },
        ];

        let total = criteria.len();
        let met = criteria.iter().filter(|c| c.met).count();
        let percentage = (met as f64 / total as f64 * 1000.0).round() / 10.0;

        Self {
            can_evolve: met == total,
            criteria,
            met,
            total,
            percentage,
        }
    }

    /// Progress as `"met/total"`.
    pub fn progress(&self) -> String {
        format!("{}/{}", self.met, self.total)
    }

    pub fn criterion(&self, kind: CriterionKind) -> Option<&EvolutionCriterion> {
        self.criteria.iter().find(|c| c.kind == kind)
    }
}
