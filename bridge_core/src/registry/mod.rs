//! Entity registry - many bridges addressed by ID.
//!
//! Each bridge sits behind its own lock, so calls against one bridge are
//! serialized while different bridges proceed independently. The registry
//! never ticks anything on its own.

use bridge_rules::{EntityId, EntityMetadata, Error, PersonalityTraits, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::config::EngineConfig;
use crate::engine::{EvolutionReadiness, FullState, LifecycleEngine, TickResult};
use crate::experience::ExperienceId;
use crate::snapshot::{EntitySnapshot, SnapshotStore};

/// Depth of a tick when the caller gives none.
pub const DEFAULT_TICK_DEPTH: f64 = 1.0;

type SharedEngine = Arc<Mutex<LifecycleEngine<StdRng>>>;

pub struct EntityRegistry {
    config: EngineConfig,
    base_seed: u64,
    /// Generators handed out so far; each bridge's seed is derived from it.
    spawned: AtomicU64,
    entities: RwLock<HashMap<EntityId, SharedEngine>>,
    store: Option<Arc<dyn SnapshotStore>>,
}

impl EntityRegistry {
    /// Create an empty registry. Without a configured seed, the base seed
    /// comes from OS entropy.
    pub fn new(config: EngineConfig) -> Self {
        let base_seed = config
            .rng
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());
        Self {
            config,
            base_seed,
            spawned: AtomicU64::new(0),
            entities: RwLock::new(HashMap::new()),
            store: None,
        }
    }

    /// Attach a snapshot store for [`persist`](Self::persist) and [`load`](Self::load).
    pub fn with_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn next_rng(&self) -> StdRng {
        let n = self.spawned.fetch_add(1, Ordering::SeqCst);
        StdRng::seed_from_u64(self.base_seed.wrapping_add(n))
    }

    fn insert(&self, engine: LifecycleEngine<StdRng>) -> EntityId {
        let id = engine.id();
        self.entities
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, Arc::new(Mutex::new(engine)));
        id
    }

    fn get(&self, id: EntityId) -> Result<SharedEngine> {
        self.entities
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound(id))
    }

    /// Run `f` with exclusive access to one bridge.
    pub fn with_entity<T>(
        &self,
        id: EntityId,
        f: impl FnOnce(&mut LifecycleEngine<StdRng>) -> T,
    ) -> Result<T> {
        let shared = self.get(id)?;
        let mut engine = shared.lock().unwrap_or_else(|e| e.into_inner());
        Ok(f(&mut engine))
    }

    // ============================================================
    // Lifecycle
    // ============================================================

    /// Create a bridge. Seed traits are validated; without them they are drawn at random.
    pub fn create(
        &self,
        name: impl Into<String>,
        category: impl Into<String>,
        seed: Option<PersonalityTraits>,
    ) -> Result<EntityId> {
        let engine = LifecycleEngine::new(
            EntityMetadata::new(name, category),
            seed,
            self.next_rng(),
            self.config.clone(),
        )?;
        tracing::info!(
            id = %engine.id(),
            name = %engine.entity().metadata().name,
            "Created bridge"
        );
        Ok(self.insert(engine))
    }

    /// Tick one bridge. `depth` defaults to 1.0.
    pub fn tick(&self, id: EntityId, depth: Option<f64>) -> Result<TickResult> {
        self.with_entity(id, |engine| {
            engine.tick(depth.unwrap_or(DEFAULT_TICK_DEPTH))
        })?
    }

    /// Queue an experience given as loosely structured data.
    pub fn add_experience(&self, id: EntityId, data: &serde_json::Value) -> Result<ExperienceId> {
        self.with_entity(id, |engine| engine.add_experience_data(data))
    }

    /// Add `peer` to the connections of `id`. Both must be registered.
    ///
    /// Only `id` gains a record; the peer is left unchanged.
    pub fn add_connection(&self, id: EntityId, peer: EntityId, strength: Option<f64>) -> Result<()> {
        let peer_name = self.with_entity(peer, |engine| engine.entity().metadata().name.clone())?;
        self.with_entity(id, |engine| engine.add_connection(peer, peer_name, strength))
    }

    /// Strengthen the record `id` holds of `peer`. Returns false if there is none.
    pub fn strengthen_connection(
        &self,
        id: EntityId,
        peer: EntityId,
        amount: Option<f64>,
    ) -> Result<bool> {
        self.with_entity(id, |engine| engine.strengthen_connection(peer, amount))
    }

    pub fn get_full_state(&self, id: EntityId) -> Result<FullState> {
        self.with_entity(id, |engine| engine.full_state())
    }

    pub fn get_evolution_readiness(&self, id: EntityId) -> Result<EvolutionReadiness> {
        self.with_entity(id, |engine| engine.evolution_readiness())
    }

    // ============================================================
    // Persistence
    // ============================================================

    pub fn snapshot(&self, id: EntityId) -> Result<EntitySnapshot> {
        self.with_entity(id, |engine| engine.snapshot())
    }

    /// Register a bridge rebuilt from a snapshot, replacing any with the same ID.
    pub fn restore(&self, snapshot: EntitySnapshot) -> Result<EntityId> {
        let engine = LifecycleEngine::restore(snapshot, self.next_rng(), self.config.clone())?;
        tracing::info!(
            id = %engine.id(),
            ticks = engine.entity().ticks(),
            "Restored bridge"
        );
        Ok(self.insert(engine))
    }

    fn store(&self) -> Result<&Arc<dyn SnapshotStore>> {
        self.store
            .as_ref()
            .ok_or_else(|| Error::store("no snapshot store configured"))
    }

    /// Save the current snapshot of a bridge to the attached store.
    pub fn persist(&self, id: EntityId) -> Result<()> {
        let store = self.store()?;
        let snapshot = self.snapshot(id)?;
        store.save(&snapshot)
    }

    /// Load a bridge from the attached store and register it.
    pub fn load(&self, id: EntityId) -> Result<EntityId> {
        let snapshot = self.store()?.load(id)?;
        self.restore(snapshot)
    }

    /// Drop a bridge from memory. Stored snapshots are untouched.
    pub fn remove(&self, id: EntityId) -> Result<()> {
        self.entities
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NotFound(id))
    }

    /// Registered IDs, sorted.
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .entities
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .copied()
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entities.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
