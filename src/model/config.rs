//! Key/value configuration entries stored alongside the catalog.

use serde::{Deserialize, Serialize};

/// Marker written once the schema has been created.
///
/// Import never overwrites it.
pub const DB_INITIALIZED_KEY: &str = "DB_INITIALIZED";

/// A stored configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}
