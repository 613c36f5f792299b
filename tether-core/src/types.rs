//! Domain types for the Tether configuration registry.
//!
//! All types are serializable/deserializable via serde + serde_yaml. Item
//! paths are opaque strings owned by the serialization layer; the core never
//! interprets them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a configuration in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigurationName(pub String);

impl fmt::Display for ConfigurationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ConfigurationName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConfigurationName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed path of an item inside the hierarchical store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemPath(pub String);

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ItemPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemPath {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Handle to a top-level serialized item — the entry point of one subtree
/// walk during sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootHandle {
    pub path: ItemPath,
}

impl RootHandle {
    pub fn new(path: impl Into<ItemPath>) -> Self {
        Self { path: path.into() }
    }
}

/// The durable record of a configuration: a named, independently syncable
/// scope of the item store.
///
/// Capability bindings (logger, resolver, synchronizer) are resolved per run
/// and never persisted; see `tether-sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: ConfigurationName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
