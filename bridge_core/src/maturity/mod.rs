//! Maturity stage machine - nascent, forming, maturing, mature.
//!
//! The stage is a pure function of tick count and only ever moves forward.

use bridge_rules::MaturityStage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturityTransition {
    pub from: MaturityStage,
    pub to: MaturityStage,
    pub tick: u64,
    /// Readiness at the moment of transition.
    pub readiness: f64,
}

/// Reportable view of the machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturityReport {
    pub current_stage: MaturityStage,
    pub ticks_in_stage: u64,
    pub total_transitions: usize,
    pub next_stage_threshold: Option<u64>,
    pub readiness_for_next: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MaturityStageMachine {
    stage: MaturityStage,
    transitions: Vec<MaturityTransition>,
}

impl MaturityStageMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted stage and history.
    pub fn restore(stage: MaturityStage, transitions: Vec<MaturityTransition>) -> Self {
        Self { stage, transitions }
    }

    /// Re-derive the stage from `tick_count`, advancing if it has moved on.
    ///
    /// Stale tick counts that map to an earlier stage are ignored.
    pub fn update(&mut self, tick_count: u64) -> Option<&MaturityTransition> {
        let target = MaturityStage::for_ticks(tick_count);
        if target <= self.stage {
            return None;
        }

        let transition = MaturityTransition {
            from: self.stage,
            to: target,
            tick: tick_count,
            readiness: MaturityStage::readiness(tick_count),
        };
        tracing::info!(
            from = %transition.from,
            to = %transition.to,
            tick = tick_count,
            "Maturity stage advanced"
        );

        self.stage = target;
        self.transitions.push(transition);
        self.transitions.last()
    }

    pub fn stage(&self) -> MaturityStage {
        self.stage
    }

    pub fn transitions(&self) -> &[MaturityTransition] {
        &self.transitions
    }

    /// Ticks since the stage was entered.
    pub fn ticks_in_stage(&self, tick_count: u64) -> u64 {
        let entered = self.transitions.last().map(|t| t.tick).unwrap_or(0);
        tick_count.saturating_sub(entered)
    }

    pub fn report(&self, tick_count: u64) -> MaturityReport {
        MaturityReport {
            current_stage: self.stage,
            ticks_in_stage: self.ticks_in_stage(tick_count),
            total_transitions: self.transitions.len(),
            next_stage_threshold: self.stage.next_threshold(),
            readiness_for_next: MaturityStage::readiness(tick_count),
            description: self.stage.description().to_string(),
        }
    }
}
