//! Personality model - traits that emerge from experience rather than being assigned.

use bridge_rules::{PersonalityTraits, Result, TraitKind};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cumulative influences needed before formation begins.
pub const FORMING_INFLUENCE_THRESHOLD: u64 = 50;

/// Maximum summed trait change between the last two snapshots for stability.
pub const STABILITY_TOLERANCE: f64 = 0.1;

/// Largest value a positive influence can reach from below 1.0.
const ASYMPTOTE: f64 = 1.0 - f64::EPSILON / 2.0;

/// The trait vector at a point in internal time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalitySnapshot {
    pub tick: u64,
    pub traits: PersonalityTraits,
    pub notes: String,
}

/// Reportable view of the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityState {
    pub traits: PersonalityTraits,
    pub forming: bool,
    pub settled: bool,
    pub total_influences: u64,
    pub history_snapshots: usize,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityModel {
    traits: PersonalityTraits,
    history: Vec<PersonalitySnapshot>,
    forming: bool,
    settled: bool,
    influences: BTreeMap<TraitKind, u64>,
}

impl PersonalityModel {
    /// Create a model from validated seed traits.
    pub fn new(seed: PersonalityTraits) -> Self {
        Self {
            traits: seed,
            history: Vec::new(),
            forming: false,
            settled: false,
            influences: TraitKind::ALL.iter().map(|kind| (*kind, 0)).collect(),
        }
    }

    /// Draw seed traits uniformly from [0.4, 0.6].
    pub fn random_seed<R: Rng + ?Sized>(rng: &mut R) -> PersonalityTraits {
        let mut traits = PersonalityTraits::default();
        for kind in TraitKind::ALL {
            traits.set(kind, rng.gen_range(0.4..=0.6));
        }
        traits
    }

    /// Rebuild a model from persisted parts. Traits and every snapshot are validated.
    pub fn restore(
        traits: PersonalityTraits,
        history: Vec<PersonalitySnapshot>,
        forming: bool,
        settled: bool,
        influences: BTreeMap<TraitKind, u64>,
    ) -> Result<Self> {
        traits.validate()?;
        for snapshot in &history {
            snapshot.traits.validate()?;
        }
        let mut model = Self::new(traits);
        model.history = history;
        model.forming = forming;
        model.settled = settled && forming;
        model.influences.extend(influences);
        Ok(model)
    }

    /// Push a trait up or down with diminishing returns near the extremes.
    ///
    /// Returns the new trait value.
    pub fn influence(&mut self, kind: TraitKind, amount: f64, tick: u64) -> f64 {
        let current = self.traits.get(kind);

        let adjustment = if amount > 0.0 {
            amount * (1.0 - current)
        } else {
            amount * current
        };

        let mut value = (current + adjustment).clamp(0.0, 1.0);
        if amount > 0.0 && current < 1.0 {
            value = value.min(ASYMPTOTE);
        }
        self.traits.set(kind, value);

        *self.influences.entry(kind).or_default() += 1;

        if !self.forming && self.total_influences() > FORMING_INFLUENCE_THRESHOLD {
            self.forming = true;
            self.snapshot(tick, "Personality formation began");
            tracing::info!(tick, "Personality formation began");
        }

        value
    }

    /// Influence a trait by name. Unknown names are a validation error.
    pub fn influence_named(&mut self, name: &str, amount: f64, tick: u64) -> Result<f64> {
        let kind: TraitKind = name.parse()?;
        Ok(self.influence(kind, amount, tick))
    }

    /// Small random drift on every trait; smaller once settled.
    pub fn evolve_slightly<R: Rng + ?Sized>(&mut self, tick: u64, rng: &mut R) {
        let drift = self.drift_magnitude();
        for kind in TraitKind::ALL {
            let change = rng.gen_range(-drift..=drift);
            self.traits.set(kind, self.traits.get(kind) + change);
        }
        tracing::trace!(tick, drift, "Personality drifted");
    }

    /// Drift magnitude for the current phase.
    pub fn drift_magnitude(&self) -> f64 {
        if self.settled {
            0.001
        } else if self.forming {
            0.01
        } else {
            0.005
        }
    }

    /// Formed, with at least two snapshots that barely differ.
    pub fn is_stable(&self) -> bool {
        if !self.forming {
            return false;
        }
        match self.history.as_slice() {
            [.., prev, last] => last.traits.distance(&prev.traits) < STABILITY_TOLERANCE,
            _ => false,
        }
    }

    /// Record a progress snapshot while forming and not yet settled.
    ///
    /// Returns whether a snapshot was taken.
    pub fn checkpoint(&mut self, tick: u64) -> bool {
        if !self.forming || self.settled {
            return false;
        }
        self.snapshot(tick, "Formation checkpoint");
        true
    }

    /// Mark the personality settled once it is forming and stable.
    ///
    /// No-op when not forming, not stable, or already settled. Returns whether
    /// this call settled it.
    pub fn settle(&mut self, tick: u64) -> bool {
        if !self.forming || self.settled || !self.is_stable() {
            return false;
        }
        self.settled = true;
        self.snapshot(tick, "Personality settled");
        tracing::info!(tick, "Personality settled");
        true
    }

    fn snapshot(&mut self, tick: u64, notes: &str) {
        self.history.push(PersonalitySnapshot {
            tick,
            traits: self.traits,
            notes: notes.to_string(),
        });
    }

    pub fn traits(&self) -> &PersonalityTraits {
        &self.traits
    }

    pub fn is_forming(&self) -> bool {
        self.forming
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn history(&self) -> &[PersonalitySnapshot] {
        &self.history
    }

    pub fn influence_counts(&self) -> &BTreeMap<TraitKind, u64> {
        &self.influences
    }

    pub fn total_influences(&self) -> u64 {
        self.influences.values().sum()
    }

    pub fn state(&self) -> PersonalityState {
        PersonalityState {
            traits: self.traits.rounded(),
            forming: self.forming,
            settled: self.settled,
            total_influences: self.total_influences(),
            history_snapshots: self.history.len(),
            description: self.traits.describe(),
        }
    }
}

impl Default for PersonalityModel {
    fn default() -> Self {
        Self::new(PersonalityTraits::default())
    }
}
