//! Import command implementation.

use crate::config::open_existing;
use crate::error::{Error, Result};
use crate::sync::{read_envelope, ImportResult, ImportStats, Importer, SyncError};
use colored::Colorize;
use std::path::Path;

/// Execute the import command.
///
/// In JSON mode the [`ImportResult`] is printed to stdout whether or not the
/// import succeeded. A failed import still returns an error so the process
/// exits non-zero.
///
/// # Errors
///
/// Returns an error if the database is missing, the file cannot be read or
/// parsed, or the import stopped part way.
pub fn execute(
    file: &Path,
    db_path: Option<&Path>,
    busy_timeout: Option<u64>,
    json: bool,
) -> Result<()> {
    let mut storage = open_existing(db_path, busy_timeout)?;
    let envelope = read_envelope(file)?;

    let result = Importer::new(&mut storage).import(&envelope);

    if json {
        println!("{}", serde_json::to_string(&result)?);
    }

    match result {
        ImportResult {
            success: true,
            stats: Some(stats),
            ..
        } => {
            if !json {
                print_stats(&stats);
            }
            Ok(())
        }
        ImportResult { error, .. } => Err(Error::Sync(SyncError::ImportFailed(
            error.unwrap_or_else(|| "unknown error".to_string()),
        ))),
    }
}

fn print_stats(stats: &ImportStats) {
    println!("{}", "Import complete".green().bold());
    println!(
        "  Groups: {} total, {} created, {} merged",
        stats.groups.total, stats.groups.created, stats.groups.merged
    );
    println!(
        "  Sites:  {} total, {} created, {} updated, {} skipped",
        stats.sites.total, stats.sites.created, stats.sites.updated, stats.sites.skipped
    );
    if stats.sites.skipped > 0 {
        println!(
            "{}",
            "  Skipped sites referenced a group missing from the envelope.".dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewGroup, NewSite};
    use crate::storage::SqliteStorage;
    use crate::sync::Exporter;
    use tempfile::TempDir;

    #[test]
    fn test_import_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.db");
        let dest = temp_dir.path().join("dest.db");
        let file = temp_dir.path().join("backup.json");

        {
            let mut storage = SqliteStorage::open(&source).unwrap();
            let group = storage.create_group(&NewGroup::new("Dev", 0)).unwrap();
            storage
                .create_site(&NewSite {
                    group_id: group.id.unwrap(),
                    name: "Docs".to_string(),
                    url: "https://docs.rs".to_string(),
                    ..NewSite::default()
                })
                .unwrap();
            Exporter::new(&storage).write_to(&file).unwrap();
        }
        SqliteStorage::open(&dest).unwrap();

        execute(&file, Some(dest.as_path()), None, true).unwrap();

        let storage = SqliteStorage::open(&dest).unwrap();
        assert_eq!(storage.list_groups().unwrap().len(), 1);
        assert_eq!(storage.list_sites(None).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("dest.db");
        SqliteStorage::open(&dest).unwrap();

        let missing = temp_dir.path().join("nope.json");
        let err = execute(&missing, Some(dest.as_path()), None, true).unwrap_err();
        assert!(matches!(err, Error::Sync(SyncError::FileNotFound(_))));
    }
}
