//! Data models for navcat.
//!
//! This module contains all domain models:
//! - Group
//! - Site
//! - ConfigEntry
//!
//! plus the write payloads the storage layer accepts.

pub mod config;
pub mod group;
pub mod site;

pub use config::{ConfigEntry, DB_INITIALIZED_KEY};
pub use group::{Group, GroupPatch, NewGroup};
pub use site::{NewSite, Site, SitePatch};

use serde::{Deserialize, Deserializer, Serialize};

/// A single `{id, order_num}` pair for batch reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: i64,
    pub order_num: i64,
}

/// Deserialize a string that may be `null` or missing as an empty string.
///
/// Envelopes from other instances store `icon`, `description` and `notes`
/// as nullable columns.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Current time as an RFC 3339 string (UTC).
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
