//! Initialize the navcat database.
//!
//! Creates the database file (and its parent directory) if needed, applies
//! the schema, and sets the `DB_INITIALIZED` marker. Running it again is
//! harmless and reports that the database was already initialized.

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
    already_initialized: bool,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the directory or database cannot be created.
pub fn execute(db_path: Option<&Path>, busy_timeout: Option<u64>, json: bool) -> Result<()> {
    let db_path = resolve_db_path(db_path)
        .ok_or_else(|| Error::Config("Could not determine database location".to_string()))?;

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut storage = SqliteStorage::open_with_timeout(&db_path, busy_timeout)?;
    let outcome = storage.init_db()?;

    if json {
        let output = InitOutput {
            database: db_path,
            already_initialized: outcome.already_initialized,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if outcome.already_initialized {
        println!("Database already initialized");
        println!("  Database: {}", db_path.display());
    } else {
        println!("{}", "Initialized navcat database".green());
        println!("  Database: {}", db_path.display());
        println!();
        println!("Next: add a group with 'navcat group add <NAME>'.");
    }

    Ok(())
}
