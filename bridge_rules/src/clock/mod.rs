//! Internal clock - tick count and accumulated internal time of a bridge.
//!
//! The clock never advances on its own. Every tick comes from an explicit
//! call to [`Clock::advance`]; any wall-clock cadence belongs to whoever
//! drives the engine.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::{Error, Result};

/// Default number of clock events kept in memory.
pub const DEFAULT_EVENT_DEPTH: usize = 100;

/// What happened at a recorded moment of internal time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockEventKind {
    Insight,
    StageTransition,
    PersonalityForming,
    PersonalitySettled,
    Dialogue,
}

/// An event stamped with the tick and internal time it occurred at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockEvent {
    pub kind: ClockEventKind,
    pub tick: u64,
    pub internal_time: f64,
    /// Intensity or significance from 0.0 to 1.0.
    pub significance: f64,
    pub description: String,
}

/// Summary of the clock for state reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockStats {
    pub ticks: u64,
    pub internal_time: f64,
    pub dilation: f64,
    pub event_count: usize,
    pub insights_recorded: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    ticks: u64,
    internal_time: f64,
    dilation: f64,
    events: VecDeque<ClockEvent>,
    event_depth: usize,
    insights_recorded: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Create a clock at tick zero with no dilation.
    pub fn new() -> Self {
        Self::with_event_depth(DEFAULT_EVENT_DEPTH)
    }

    /// Create a clock that retains at most `depth` events.
    pub fn with_event_depth(depth: usize) -> Self {
        Self {
            ticks: 0,
            internal_time: 0.0,
            dilation: 1.0,
            events: VecDeque::new(),
            event_depth: depth,
            insights_recorded: 0,
        }
    }

    /// Rebuild a clock from persisted values.
    pub fn restore(
        ticks: u64,
        internal_time: f64,
        dilation: f64,
        events: Vec<ClockEvent>,
        insights_recorded: u64,
        depth: usize,
    ) -> Result<Self> {
        if !internal_time.is_finite() || internal_time < 0.0 {
            return Err(Error::store(format!(
                "internal time must be finite and non-negative, got {}",
                internal_time
            )));
        }
        let mut clock = Self::with_event_depth(depth);
        clock.set_dilation(dilation)?;
        clock.ticks = ticks;
        clock.internal_time = internal_time;
        clock.insights_recorded = insights_recorded;
        for event in events {
            clock.push_event(event);
        }
        Ok(clock)
    }

    /// Advance one tick. Internal time grows by `depth * dilation`.
    ///
    /// A negative or non-finite depth, or a tick count already at `u64::MAX`,
    /// is rejected and leaves the clock untouched.
    pub fn advance(&mut self, depth: f64) -> Result<u64> {
        if !depth.is_finite() || depth < 0.0 {
            return Err(Error::InvalidDepth(depth));
        }
        self.ticks = self
            .ticks
            .checked_add(1)
            .ok_or(Error::TickOverflow(self.ticks))?;
        self.internal_time += depth * self.dilation;
        Ok(self.ticks)
    }

    /// Change the dilation factor applied to future ticks.
    pub fn set_dilation(&mut self, dilation: f64) -> Result<()> {
        if !dilation.is_finite() || dilation <= 0.0 {
            return Err(Error::InvalidDilation(dilation));
        }
        self.dilation = dilation;
        Ok(())
    }

    /// Record an event at the current tick.
    pub fn record_event(
        &mut self,
        kind: ClockEventKind,
        significance: f64,
        description: impl Into<String>,
    ) {
        if kind == ClockEventKind::Insight {
            self.insights_recorded += 1;
        }
        let event = ClockEvent {
            kind,
            tick: self.ticks,
            internal_time: self.internal_time,
            significance: significance.clamp(0.0, 1.0),
            description: description.into(),
        };
        self.push_event(event);
    }

    fn push_event(&mut self, event: ClockEvent) {
        self.events.push_back(event);
        while self.events.len() > self.event_depth {
            self.events.pop_front();
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn internal_time(&self) -> f64 {
        self.internal_time
    }

    pub fn dilation(&self) -> f64 {
        self.dilation
    }

    /// The most recent `limit` events, oldest first.
    pub fn recent_events(&self, limit: usize) -> Vec<&ClockEvent> {
        let skip = self.events.len().saturating_sub(limit);
        self.events.iter().skip(skip).collect()
    }

    pub fn events(&self) -> impl Iterator<Item = &ClockEvent> {
        self.events.iter()
    }

    pub fn stats(&self) -> ClockStats {
        ClockStats {
            ticks: self.ticks,
            internal_time: self.internal_time,
            dilation: self.dilation,
            event_count: self.events.len(),
            insights_recorded: self.insights_recorded,
        }
    }
}
