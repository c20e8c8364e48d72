//! Entity identity and the per-entity records owned by the lifecycle engine.

mod connection;
mod traits;

pub use connection::*;
pub use traits::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Model version stamped into every bridge's metadata.
pub const MODEL_VERSION: &str = "2.0-reloaded";

/// Unique identifier for every bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an entity ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil/empty entity ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntityId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Descriptive metadata of a bridge. Never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub id: EntityId,
    pub name: String,
    /// Free-form category tag, `"general"` unless given.
    pub category: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub version: String,
}

impl EntityMetadata {
    /// Create metadata for a new bridge with a fresh ID.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            category: category.into(),
            description: None,
            created_at: Utc::now(),
            version: MODEL_VERSION.to_string(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Use a specific ID instead of a random one.
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_roundtrip_through_string() {
        let id = EntityId::new();
        let parsed: EntityId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_metadata_defaults() {
        let meta = EntityMetadata::new("Philosopher", "general");
        assert_eq!(meta.name, "Philosopher");
        assert_eq!(meta.category, "general");
        assert_eq!(meta.version, MODEL_VERSION);
        assert!(meta.description.is_none());
        assert_ne!(meta.id, EntityId::nil());
    }

    #[test]
    fn test_metadata_builder() {
        let id = EntityId::nil();
        let meta = EntityMetadata::new("Scout", "explorer")
            .with_id(id)
            .with_description("Maps unknown territory");
        assert_eq!(meta.id, id);
        assert_eq!(meta.description.as_deref(), Some("Maps unknown territory"));
    }
}
