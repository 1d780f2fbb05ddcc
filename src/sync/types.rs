//! Sync types for envelope export/import.
//!
//! The envelope is the whole catalog at one point in time. Import results
//! serialize to the same shape other instances expect:
//! `{"success": true, "stats": {...}}` or `{"success": false, "error": "..."}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Group, Site};

/// The only envelope format currently defined.
pub const ENVELOPE_VERSION: &str = "1.0";

/// A self-contained snapshot of groups, sites and configs.
///
/// Group and site ids inside an envelope belong to the instance that
/// produced it. Import maps them onto local ids and never reuses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEnvelope {
    /// Groups ordered by `order_num`.
    pub groups: Vec<Group>,
    /// Sites ordered by `order_num`.
    pub sites: Vec<Site>,
    /// Flat key/value configuration.
    #[serde(default)]
    pub configs: BTreeMap<String, String>,
    /// Format tag, `"1.0"`.
    pub version: String,
    /// ISO8601 timestamp of the export.
    #[serde(rename = "exportDate")]
    pub export_date: String,
}

/// Outcome of one import call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ImportStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportResult {
    /// A successful import with its statistics.
    #[must_use]
    pub fn succeeded(stats: ImportStats) -> Self {
        Self {
            success: true,
            stats: Some(stats),
            error: None,
        }
    }

    /// A failed import. Writes applied before the failure stay applied.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            stats: None,
            error: Some(message.into()),
        }
    }
}

/// Statistics for an import operation.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    pub groups: GroupStats,
    pub sites: SiteStats,
}

/// Group counters. `created + merged == total` after a successful import.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStats {
    /// Groups in the envelope.
    pub total: usize,
    /// Groups that did not exist by name and were created.
    pub created: usize,
    /// Groups matched by name to an existing group.
    pub merged: usize,
}

impl GroupStats {
    /// Number of groups processed so far.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.created + self.merged
    }
}

/// Site counters. `created + updated + skipped == total` after a
/// successful import.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteStats {
    /// Sites in the envelope.
    pub total: usize,
    /// New sites written.
    pub created: usize,
    /// Existing sites (same group and URL) refreshed in place.
    pub updated: usize,
    /// Sites whose group could not be resolved.
    pub skipped: usize,
}

impl SiteStats {
    /// Number of sites processed so far.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.created + self.updated + self.skipped
    }
}

/// Sync-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Envelope file not found.
    #[error("Envelope file not found: {0}")]
    FileNotFound(String),

    /// An import stopped part way; earlier writes remain.
    #[error("Import failed: {0}")]
    ImportFailed(String),
}

/// Result type for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;
