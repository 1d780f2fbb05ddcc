//! Envelope import with reconciliation.
//!
//! Records are matched on natural keys rather than ids: groups by exact
//! name, sites by (group, url). Import runs in three sequential phases:
//!
//! 1. Groups: merge into a same-named group or create one, building the
//!    map from envelope group ids to local ids.
//! 2. Sites: resolve the owning group through that map, then refresh the
//!    existing site with the same URL or create a new one. Sites whose
//!    group cannot be resolved are skipped.
//! 3. Configs: overwrite every key except `DB_INITIALIZED`. A key that
//!    fails to write is logged and skipped.
//!
//! Each record write is its own transaction. The import as a whole is not:
//! when a group or site write fails, everything written before it stays.

use std::collections::HashMap;

use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::model::{DB_INITIALIZED_KEY, Group, NewGroup, NewSite, Site};
use crate::storage::sqlite::{SiteUpsert, SqliteStorage};
use crate::sync::types::{
    ENVELOPE_VERSION, ExportEnvelope, GroupStats, ImportResult, ImportStats, SiteStats,
};

/// Merges an [`ExportEnvelope`] into a database.
///
/// Holds no state between calls; the id map and counters live only for
/// the duration of [`Importer::import`].
pub struct Importer<'a> {
    storage: &'a mut SqliteStorage,
}

impl<'a> Importer<'a> {
    #[must_use]
    pub fn new(storage: &'a mut SqliteStorage) -> Self {
        Self { storage }
    }

    /// Import an envelope.
    ///
    /// Never returns an error: a failure in any phase stops the import and
    /// is reported as `success: false` with the error message. Writes that
    /// completed before the failure are not rolled back.
    pub fn import(&mut self, envelope: &ExportEnvelope) -> ImportResult {
        match self.run(envelope) {
            Ok(stats) => {
                info!(
                    groups_created = stats.groups.created,
                    groups_merged = stats.groups.merged,
                    sites_created = stats.sites.created,
                    sites_updated = stats.sites.updated,
                    sites_skipped = stats.sites.skipped,
                    "Import complete"
                );
                ImportResult::succeeded(stats)
            }
            Err(e) => {
                error!(error = %e, "Import failed; earlier writes remain applied");
                ImportResult::failed(e.to_string())
            }
        }
    }

    fn run(&mut self, envelope: &ExportEnvelope) -> Result<ImportStats> {
        if envelope.version != ENVELOPE_VERSION {
            warn!(
                version = %envelope.version,
                expected = ENVELOPE_VERSION,
                "Unknown envelope version; importing as {ENVELOPE_VERSION}"
            );
        }

        let mut stats = ImportStats {
            groups: GroupStats {
                total: envelope.groups.len(),
                ..GroupStats::default()
            },
            sites: SiteStats {
                total: envelope.sites.len(),
                ..SiteStats::default()
            },
        };

        let group_map = self.import_groups(&envelope.groups, &mut stats.groups)?;
        self.import_sites(&envelope.sites, &group_map, &mut stats.sites)?;
        self.import_configs(&envelope.configs);

        Ok(stats)
    }

    /// Phase 1. Returns the envelope-id → local-id map.
    fn import_groups(
        &mut self,
        groups: &[Group],
        stats: &mut GroupStats,
    ) -> Result<HashMap<i64, i64>> {
        let mut group_map = HashMap::with_capacity(groups.len());

        for group in groups {
            let (local, created) = self
                .storage
                .find_or_create_group(&NewGroup::new(group.name.clone(), group.order_num))?;

            // A source id of 0 counts as absent
            if let (Some(source_id), Some(local_id)) = (group.id.filter(|&id| id != 0), local.id) {
                group_map.insert(source_id, local_id);
            }

            if created {
                debug!(name = %group.name, id = ?local.id, "Created group");
                stats.created += 1;
            } else {
                debug!(name = %group.name, id = ?local.id, "Merged into existing group");
                stats.merged += 1;
            }
        }

        Ok(group_map)
    }

    /// Phase 2.
    fn import_sites(
        &mut self,
        sites: &[Site],
        group_map: &HashMap<i64, i64>,
        stats: &mut SiteStats,
    ) -> Result<()> {
        for site in sites {
            let Some(&group_id) = group_map.get(&site.group_id) else {
                warn!(
                    site = %site.name,
                    group_id = site.group_id,
                    "No imported group for site; skipped"
                );
                stats.skipped += 1;
                continue;
            };

            let upsert = self
                .storage
                .upsert_site_by_url(&NewSite::from_snapshot(site, group_id))?;
            debug!(url = %site.url, id = ?upsert.site().id, group_id, "Imported site");

            match upsert {
                SiteUpsert::Created(_) => stats.created += 1,
                SiteUpsert::Updated(_) => stats.updated += 1,
            }
        }

        Ok(())
    }

    /// Phase 3. Returns the number of keys written.
    ///
    /// A key that fails to write is logged and skipped; it never fails the
    /// import.
    fn import_configs(&mut self, configs: &std::collections::BTreeMap<String, String>) -> usize {
        let mut written = 0;
        for (key, value) in configs {
            if key == DB_INITIALIZED_KEY {
                continue;
            }
            match self.storage.set_config(key, value) {
                Ok(()) => written += 1,
                Err(e) => warn!(key = %key, error = %e, "Config write failed; key skipped"),
            }
        }

        debug!(written, "Imported configs");
        written
    }
}
