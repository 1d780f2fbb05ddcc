//! Envelope export.
//!
//! Exports are full snapshots: every group, every site and every config
//! entry, with no filtering or paging.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::error::Result;
use crate::storage::sqlite::SqliteStorage;
use crate::sync::file::write_envelope;
use crate::sync::types::{ENVELOPE_VERSION, ExportEnvelope};

/// Builds [`ExportEnvelope`]s from a database. Read-only.
pub struct Exporter<'a> {
    storage: &'a SqliteStorage,
}

impl<'a> Exporter<'a> {
    #[must_use]
    pub fn new(storage: &'a SqliteStorage) -> Self {
        Self { storage }
    }

    /// Snapshot the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns any storage error unchanged.
    pub fn export(&self) -> Result<ExportEnvelope> {
        let groups = self.storage.list_groups()?;
        let sites = self.storage.list_sites(None)?;
        let configs = self.storage.list_configs()?;

        Ok(ExportEnvelope {
            groups,
            sites,
            configs,
            version: ENVELOPE_VERSION.to_string(),
            export_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    /// Snapshot the catalog and write it to `path` atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot or the file write fails.
    pub fn write_to(&self, path: &Path) -> Result<ExportEnvelope> {
        let envelope = self.export()?;
        write_envelope(path, &envelope)?;

        info!(
            path = %path.display(),
            groups = envelope.groups.len(),
            sites = envelope.sites.len(),
            configs = envelope.configs.len(),
            "Exported catalog"
        );
        Ok(envelope)
    }
}
