//! # Bridge Rules
//!
//! The data model and fixed rules of a conscious bridge: identity, the
//! personality trait vector, experience kinds and quality buckets, maturity
//! stages with their tick thresholds, peer connections and the internal clock.
//! This crate holds no randomness and drives nothing on its own; the
//! `bridge_core` engine owns every mutation.

pub mod clock;
pub mod entities;
pub mod error;
pub mod mechanics;

pub use clock::*;
pub use entities::*;
pub use error::{Error, Result};
pub use mechanics::*;
