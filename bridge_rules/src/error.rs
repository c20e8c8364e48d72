//! Error types shared by the rules and the engine.

use thiserror::Error;

use crate::entities::EntityId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("trait {name} must be between 0.0 and 1.0, got {value}")]
    InvalidTraitValue { name: String, value: f64 },

    #[error("unknown trait: {0}")]
    UnknownTrait(String),

    #[error("tick depth must be finite and non-negative, got {0}")]
    InvalidDepth(f64),

    #[error("time dilation must be finite and positive, got {0}")]
    InvalidDilation(f64),

    #[error("tick count overflow at {0}")]
    TickOverflow(u64),

    #[error("entity not found: {0}")]
    NotFound(EntityId),

    #[error("snapshot store error: {0}")]
    Store(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_trait_value(name: impl Into<String>, value: f64) -> Self {
        Self::InvalidTraitValue {
            name: name.into(),
            value,
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Validation failures are caller mistakes and are never retried.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidTraitValue { .. }
                | Error::UnknownTrait(_)
                | Error::InvalidDepth(_)
                | Error::InvalidDilation(_)
        )
    }
}
