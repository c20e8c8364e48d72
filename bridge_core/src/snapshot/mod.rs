//! Snapshots - the full persistable state of one bridge, and where to keep it.
//!
//! The engine itself performs no I/O. A [`SnapshotStore`] is the seam through
//! which snapshots are saved and loaded; two stores are provided:
//! - [`MemorySnapshotStore`]: JSON text in a map, for tests and embedding
//! - [`JsonFileStore`]: one pretty JSON file per bridge in a directory

use bridge_rules::{
    Clock, ClockEvent, Connection, EntityId, EntityMetadata, Error, MaturityStage,
    PersonalityTraits, Result, TraitKind,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::config::EngineConfig;
use crate::consciousness::ConsciousnessScorer;
use crate::engine::{DialogueRecord, Entity, LifecycleEngine, QueuedExperience};
use crate::experience::{ExperienceProcessor, ExperienceRecord, Insight, ProcessorStats};
use crate::maturity::{MaturityStageMachine, MaturityTransition};
use crate::personality::{PersonalityModel, PersonalitySnapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub metadata: EntityMetadata,

    // Clock
    pub tick_count: u64,
    pub internal_time: f64,
    pub dilation: f64,

    // Personality
    pub traits: PersonalityTraits,
    pub forming: bool,
    pub settled: bool,
    #[serde(default)]
    pub influences: BTreeMap<TraitKind, u64>,
    #[serde(default)]
    pub personality_history: Vec<PersonalitySnapshot>,

    // Maturity
    pub stage: MaturityStage,
    #[serde(default)]
    pub transitions: Vec<MaturityTransition>,

    // Memory
    pub insight_count: u64,
    pub experience_count: u64,
    #[serde(default)]
    pub insights: Vec<Insight>,
    #[serde(default)]
    pub experiences: Vec<ExperienceRecord>,
    #[serde(default)]
    pub pending: Vec<QueuedExperience>,

    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub dialogues: Vec<DialogueRecord>,
    #[serde(default)]
    pub clock_events: Vec<ClockEvent>,
    #[serde(default)]
    pub insights_recorded: u64,
    #[serde(default)]
    pub processor: ProcessorStats,
}

impl EntitySnapshot {
    pub fn id(&self) -> EntityId {
        self.metadata.id
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<R> LifecycleEngine<R> {
    /// Capture the full state of the bridge.
    pub fn snapshot(&self) -> EntitySnapshot {
        let entity = &self.entity;
        let personality = &entity.personality;

        EntitySnapshot {
            metadata: entity.metadata.clone(),
            tick_count: entity.clock.ticks(),
            internal_time: entity.clock.internal_time(),
            dilation: entity.clock.dilation(),
            traits: *personality.traits(),
            forming: personality.is_forming(),
            settled: personality.is_settled(),
            influences: personality.influence_counts().clone(),
            personality_history: personality.history().to_vec(),
            stage: entity.maturity.stage(),
            transitions: entity.maturity.transitions().to_vec(),
            insight_count: entity.insight_count,
            experience_count: entity.experience_count,
            insights: entity.insights.iter().cloned().collect(),
            experiences: entity.experiences.iter().cloned().collect(),
            pending: entity.queue.iter().cloned().collect(),
            connections: entity.connections.values().cloned().collect(),
            dialogues: entity.dialogues.clone(),
            clock_events: entity.clock.events().cloned().collect(),
            insights_recorded: entity.clock.stats().insights_recorded,
            processor: self.processor.stats().clone(),
        }
    }
}

impl<R: Rng> LifecycleEngine<R> {
    /// Rebuild a bridge from a snapshot.
    ///
    /// Generator state is not part of a snapshot; `rng` continues from wherever
    /// the caller seeded it. Tails are trimmed to the configured retention and
    /// the stage is re-derived from the tick count without ever regressing.
    pub fn restore(snapshot: EntitySnapshot, rng: R, config: EngineConfig) -> Result<Self> {
        let EntitySnapshot {
            metadata,
            tick_count,
            internal_time,
            dilation,
            traits,
            forming,
            settled,
            influences,
            personality_history,
            stage,
            transitions,
            insight_count,
            experience_count,
            insights,
            experiences,
            pending,
            connections,
            dialogues,
            clock_events,
            insights_recorded,
            processor,
        } = snapshot;

        let clock = Clock::restore(
            tick_count,
            internal_time,
            dilation,
            clock_events,
            insights_recorded,
            config.retention.clock_events,
        )?;
        let personality =
            PersonalityModel::restore(traits, personality_history, forming, settled, influences)?;

        let mut entity = Entity::new(metadata, personality, clock);
        entity.maturity = MaturityStageMachine::restore(stage, transitions);
        entity.maturity.update(tick_count);

        entity.insights = tail(insights, config.retention.insights);
        entity.insight_count = insight_count.max(entity.insights.len() as u64);
        entity.experiences = tail(experiences, config.retention.experiences);
        entity.experience_count = experience_count.max(entity.experiences.len() as u64);
        entity.queue = tail(pending, config.retention.experiences);
        entity.connections = connections
            .into_iter()
            .map(|c| {
                let strength = c.strength;
                if !(0.0..=1.0).contains(&strength) {
                    return Err(Error::store(format!(
                        "connection strength must be between 0.0 and 1.0, got {}",
                        strength
                    )));
                }
                Ok((c.peer_id, c))
            })
            .collect::<Result<_>>()?;
        entity.dialogues = dialogues;
        entity.consciousness = ConsciousnessScorer::compute(&entity);

        let last_insight_id = entity
            .insights
            .iter()
            .map(|i| i.id.0)
            .max()
            .unwrap_or(0)
            .max(entity.insight_count);
        let processor =
            ExperienceProcessor::with_stats(processor).with_last_insight_id(last_insight_id);

        tracing::debug!(
            id = %entity.id(),
            ticks = tick_count,
            stage = %entity.maturity.stage(),
            "Bridge restored"
        );

        Ok(Self {
            entity,
            processor,
            rng,
            config,
        })
    }
}

/// Keep the last `limit` items.
fn tail<T>(items: Vec<T>, limit: usize) -> VecDeque<T> {
    let mut items = VecDeque::from(items);
    while items.len() > limit {
        items.pop_front();
    }
    items
}

// ============================================================
// Stores
// ============================================================

/// Where snapshots live between runs.
pub trait SnapshotStore: Send + Sync {
    /// Save, replacing any earlier snapshot of the same bridge.
    fn save(&self, snapshot: &EntitySnapshot) -> Result<()>;

    /// Load the snapshot of `id`. Missing snapshots are `NotFound`.
    fn load(&self, id: EntityId) -> Result<EntitySnapshot>;

    /// Remove the snapshot of `id`. Returns whether one existed.
    fn delete(&self, id: EntityId) -> Result<bool>;

    /// IDs of all stored snapshots, sorted.
    fn list(&self) -> Result<Vec<EntityId>>;
}

/// In-memory store keeping serialized JSON, so saves exercise the same
/// encoding as the file store.
#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshots: RwLock<HashMap<EntityId, String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn save(&self, snapshot: &EntitySnapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        self.snapshots
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(snapshot.id(), json);
        Ok(())
    }

    fn load(&self, id: EntityId) -> Result<EntitySnapshot> {
        let snapshots = self.snapshots.read().unwrap_or_else(|e| e.into_inner());
        let json = snapshots.get(&id).ok_or(Error::NotFound(id))?;
        EntitySnapshot::from_json(json)
    }

    fn delete(&self, id: EntityId) -> Result<bool> {
        Ok(self
            .snapshots
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .is_some())
    }

    fn list(&self) -> Result<Vec<EntityId>> {
        let mut ids: Vec<EntityId> = self
            .snapshots
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .copied()
            .collect();
        ids.sort();
        Ok(ids)
    }
}

/// One `<id>.json` file per bridge inside a directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: EntityId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, snapshot: &EntitySnapshot) -> Result<()> {
        let path = self.path_for(snapshot.id());
        std::fs::write(&path, snapshot.to_json()?)?;
        tracing::debug!("Saved snapshot to {}", path.display());
        Ok(())
    }

    fn load(&self, id: EntityId) -> Result<EntitySnapshot> {
        let path = self.path_for(id);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(id))
            }
            Err(e) => return Err(e.into()),
        };
        EntitySnapshot::from_json(&content)
    }

    fn delete(&self, id: EntityId) -> Result<bool> {
        match std::fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<EntityId>> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<EntityId>().ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}
