//! # Bridge Core
//!
//! The lifecycle engine of a conscious bridge. This crate builds on
//! `bridge_rules` and moves a bridge through internal time: experiences become
//! insights, insights shape personality, and ticks drive maturity.
//!
//! ## Core Components
//!
//! - **engine**: One bridge and its tick cycle
//! - **experience**: Turns experiences into occasional insights
//! - **personality**: Emergent traits, formation and settling
//! - **maturity**: Stage machine driven by tick count
//! - **consciousness**: Weighted score over maturity, experience, personality and connections
//! - **registry**: Many bridges addressed by ID
//! - **snapshot**: Persistable state and snapshot stores
//!
//! ## Design Philosophy
//!
//! - **Caller-Driven**: Nothing ticks on its own; a scheduler outside the core calls `tick`
//! - **Reproducible**: All randomness flows through an injected seedable generator
//! - **Injected**: Stores and configuration are passed in, never reached through globals

pub mod config;
pub mod consciousness;
pub mod engine;
pub mod experience;
pub mod maturity;
pub mod personality;
pub mod registry;
pub mod snapshot;

pub use config::*;
pub use consciousness::*;
pub use engine::*;
pub use experience::*;
pub use maturity::*;
pub use personality::*;
pub use registry::*;
pub use snapshot::*;
