//! Result and report types returned by the engine.

use bridge_rules::{
    ClockStats, Connection, EntityMetadata, ExperienceKind, MaturityStage, QualityBucket,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::EvolutionReadiness;
use crate::consciousness::ConsciousnessBreakdown;
use crate::experience::{Insight, QualityStats};
use crate::maturity::{MaturityReport, MaturityTransition};
use crate::personality::PersonalityState;

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    pub tick: u64,
    pub internal_time: f64,
    /// Insight produced this tick, if any.
    pub insight: Option<Insight>,
    /// Stage transition this tick, if any.
    pub transition: Option<MaturityTransition>,
    /// Whether the personality settled this tick.
    pub personality_settled: bool,
    pub stage: MaturityStage,
    /// Exact consciousness score after the tick.
    pub consciousness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryCounts {
    pub experiences: u64,
    pub insights: u64,
    pub retained_experiences: usize,
    pub retained_insights: usize,
    pub queued_experiences: usize,
    pub dialogues: usize,
    pub wisdom_fragments: usize,
    pub wisdom_level: f64,
    pub average_insight_significance: f64,
    /// Links between retained insights, counted from both ends.
    pub insight_links: usize,
    pub insight_clusters: usize,
    /// Retained insights per category.
    pub insights_by_kind: BTreeMap<ExperienceKind, usize>,
    /// Processing quality per category, over every processed experience.
    pub quality: BTreeMap<ExperienceKind, QualityStats>,
    pub buckets: BTreeMap<QualityBucket, u64>,
}

/// Complete state of a bridge for collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullState {
    pub metadata: EntityMetadata,
    pub clock: ClockStats,
    pub personality: PersonalityState,
    pub maturity: MaturityReport,
    pub consciousness: ConsciousnessBreakdown,
    pub memory: MemoryCounts,
    pub connections: Vec<Connection>,
    pub evolution: EvolutionReadiness,
}
