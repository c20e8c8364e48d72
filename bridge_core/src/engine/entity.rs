//! The state of one bridge, owned and mutated by its lifecycle engine.

use bridge_rules::{Clock, Connection, EntityId, EntityMetadata, ExperienceKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use uuid::Uuid;

use crate::experience::{
    Experience, ExperienceId, ExperienceProcessor, ExperienceRecord, Insight, InsightId,
};
use crate::maturity::MaturityStageMachine;
use crate::personality::PersonalityModel;

/// Identifier of a dialogue started by a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogueId(pub Uuid);

impl DialogueId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DialogueId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DialogueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueRecord {
    pub id: DialogueId,
    pub peer_id: EntityId,
    pub topic: String,
    pub started_at_tick: u64,
}

/// An experience waiting for a tick to process it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedExperience {
    pub id: ExperienceId,
    pub experience: Experience,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub(crate) metadata: EntityMetadata,
    pub(crate) clock: Clock,
    pub(crate) personality: PersonalityModel,
    pub(crate) maturity: MaturityStageMachine,

    /// Retained tail of experience records.
    pub(crate) experiences: VecDeque<ExperienceRecord>,
    pub(crate) experience_count: u64,
    pub(crate) queue: VecDeque<QueuedExperience>,

    /// Retained tail of insights.
    pub(crate) insights: VecDeque<Insight>,
    pub(crate) insight_count: u64,

    pub(crate) connections: BTreeMap<EntityId, Connection>,
    pub(crate) dialogues: Vec<DialogueRecord>,

    /// Last computed consciousness score, exact.
    pub(crate) consciousness: f64,
}

impl Entity {
    pub(crate) fn new(metadata: EntityMetadata, personality: PersonalityModel, clock: Clock) -> Self {
        Self {
            metadata,
            clock,
            personality,
            maturity: MaturityStageMachine::new(),
            experiences: VecDeque::new(),
            experience_count: 0,
            queue: VecDeque::new(),
            insights: VecDeque::new(),
            insight_count: 0,
            connections: BTreeMap::new(),
            dialogues: Vec::new(),
            consciousness: 0.0,
        }
    }

    pub fn id(&self) -> EntityId {
        self.metadata.id
    }

    pub fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn personality(&self) -> &PersonalityModel {
        &self.personality
    }

    pub fn maturity(&self) -> &MaturityStageMachine {
        &self.maturity
    }

    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    /// Total insights ever produced, including those no longer retained.
    pub fn insight_count(&self) -> u64 {
        self.insight_count
    }

    /// Total experiences ever added, including those no longer retained.
    pub fn experience_count(&self) -> u64 {
        self.experience_count
    }

    pub fn insights(&self) -> impl Iterator<Item = &Insight> {
        self.insights.iter()
    }

    pub fn insight(&self, id: InsightId) -> Option<&Insight> {
        self.insights.iter().find(|i| i.id == id)
    }

    /// Retained insights linked to `id`. Links to insights no longer
    /// retained are skipped.
    pub fn connected_insights(&self, id: InsightId) -> Vec<&Insight> {
        let Some(insight) = self.insight(id) else {
            return Vec::new();
        };
        insight
            .references
            .iter()
            .filter_map(|other| self.insight(*other))
            .collect()
    }

    pub fn insights_by_kind(&self, kind: ExperienceKind) -> Vec<&Insight> {
        self.insights.iter().filter(|i| i.category == kind).collect()
    }

    /// Retained insights with significance at least `min`.
    pub fn insights_above(&self, min: f64) -> Vec<&Insight> {
        self.insights
            .iter()
            .filter(|i| i.significance >= min)
            .collect()
    }

    /// Total links across retained insights. Each link is counted from both ends.
    pub fn insight_links(&self) -> usize {
        self.insights.iter().map(|i| i.references.len()).sum()
    }

    /// Groups of two or more retained insights reachable through links,
    /// in order of their oldest member.
    pub fn insight_clusters(&self) -> Vec<Vec<InsightId>> {
        let by_id: HashMap<InsightId, &Insight> = self.insights.iter().map(|i| (i.id, i)).collect();
        let mut visited = HashSet::new();
        let mut clusters = Vec::new();

        for start in &self.insights {
            if visited.contains(&start.id) {
                continue;
            }
            let mut cluster = Vec::new();
            let mut stack = vec![start.id];
            while let Some(id) = stack.pop() {
                if !visited.insert(id) {
                    continue;
                }
                cluster.push(id);
                if let Some(insight) = by_id.get(&id) {
                    stack.extend(
                        insight
                            .references
                            .iter()
                            .filter(|r| by_id.contains_key(*r) && !visited.contains(*r)),
                    );
                }
            }
            if cluster.len() > 1 {
                clusters.push(cluster);
            }
        }
        clusters
    }

    /// Wisdom in [0.0, 1.0], rounded to 3 decimals:
    /// - 0.4 × share of insights with significance above 0.7
    /// - 0.3 × links per insight, saturating at 5
    /// - 0.3 × wisdom fragments, saturating at 20
    pub fn wisdom_level(&self) -> f64 {
        if self.insights.is_empty() {
            return 0.0;
        }
        let total = self.insights.len() as f64;
        let high = self.insights.iter().filter(|i| i.significance > 0.7).count() as f64;
        let links = self.insight_links() as f64;
        let fragments = self.insights.iter().filter(|i| i.is_wisdom()).count() as f64;

        let score = high / total * 0.4
            + (links / total).min(5.0) / 5.0 * 0.3
            + fragments.min(20.0) / 20.0 * 0.3;
        (score * 1000.0).round() / 1000.0
    }

    pub fn experiences(&self) -> impl Iterator<Item = &ExperienceRecord> {
        self.experiences.iter()
    }

    /// The `count` most recent retained experiences, newest first.
    pub fn recent_experiences(&self, count: usize) -> Vec<&ExperienceRecord> {
        self.experiences.iter().rev().take(count).collect()
    }

    pub fn experiences_by_kind(&self, kind: ExperienceKind) -> Vec<&ExperienceRecord> {
        self.experiences
            .iter()
            .filter(|r| r.experience.kind == kind)
            .collect()
    }

    /// Retained experiences whose quality value is at least `threshold`.
    pub fn high_quality_experiences(&self, threshold: f64) -> Vec<&ExperienceRecord> {
        self.experiences
            .iter()
            .filter(|r| ExperienceProcessor::quality_value(&r.experience) >= threshold)
            .collect()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn connection(&self, peer_id: EntityId) -> Option<&Connection> {
        self.connections.get(&peer_id)
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn dialogues(&self) -> &[DialogueRecord] {
        &self.dialogues
    }

    pub fn consciousness(&self) -> f64 {
        self.consciousness
    }
}

/// Push onto a retained tail, dropping the oldest entries past `limit`.
pub(crate) fn push_bounded<T>(tail: &mut VecDeque<T>, item: T, limit: usize) {
    tail.push_back(item);
    while tail.len() > limit {
        tail.pop_front();
    }
}
