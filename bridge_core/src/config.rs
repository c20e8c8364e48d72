//! Engine configuration
//!
//! Retention limits, tick cadences and connection defaults. Loaded from TOML,
//! falls back to defaults if no config file exists or it fails to parse.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// How much history each bridge keeps in memory.
    pub retention: RetentionConfig,
    /// Tick intervals of periodic personality work.
    pub cadence: CadenceConfig,
    /// Defaults for peer connections.
    pub connections: ConnectionConfig,
    /// Random number generation.
    pub rng: RngConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Most recent experience records kept.
    pub experiences: usize,
    /// Most recent insights kept. Totals are tracked regardless.
    pub insights: usize,
    /// Clock events kept.
    pub clock_events: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    /// Apply personality drift every N ticks.
    pub evolve_every: u64,
    /// Checkpoint personality and try to settle it every N ticks.
    pub stability_every: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Strength of a new connection when none is given.
    pub default_strength: f64,
    /// Strength added per interaction when no amount is given.
    pub strengthen_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RngConfig {
    /// Base seed. Unset means OS entropy, and runs are not reproducible.
    pub seed: Option<u64>,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            experiences: 1_000,
            insights: 1_000,
            clock_events: bridge_rules::DEFAULT_EVENT_DEPTH,
        }
    }
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            evolve_every: 100,
            stability_every: 500,
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            default_strength: 0.5,
            strengthen_amount: 0.1,
        }
    }
}

// ============================================================
// Loading
// ============================================================

impl EngineConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the current config as TOML (for generating a default config file).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng.seed = Some(seed);
        self
    }
}

impl CadenceConfig {
    /// Whether drift is due at `tick`. A zero interval counts as every tick.
    pub fn evolve_due(&self, tick: u64) -> bool {
        tick % self.evolve_every.max(1) == 0
    }

    /// Whether a stability checkpoint is due at `tick`.
    pub fn stability_due(&self, tick: u64) -> bool {
        tick % self.stability_every.max(1) == 0
    }
}
