//! Status command implementation.

use crate::config::{open_existing, resolve_db_path, AuthSettings};
use crate::error::{Error, Result};
use crate::model::DB_INITIALIZED_KEY;
use crate::storage::CatalogCounts;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Output for status command.
#[derive(Serialize)]
struct StatusOutput {
    database: PathBuf,
    initialized: bool,
    auth_enabled: bool,
    counts: CatalogCounts,
}

/// Execute status command.
///
/// # Errors
///
/// Returns an error if the database does not exist or cannot be read.
pub fn execute(db_path: Option<&Path>, busy_timeout: Option<u64>, json: bool) -> Result<()> {
    let resolved = resolve_db_path(db_path)
        .ok_or_else(|| Error::Config("Could not determine database location".to_string()))?;
    let storage = open_existing(Some(resolved.as_path()), busy_timeout)?;

    let output = StatusOutput {
        initialized: storage.get_config(DB_INITIALIZED_KEY)?.as_deref() == Some("true"),
        auth_enabled: AuthSettings::from_env().enabled,
        counts: storage.counts()?,
        database: resolved,
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", "navcat status".bold().underline());
    println!();
    println!("  Database:    {}", output.database.display());
    println!(
        "  Initialized: {}",
        if output.initialized {
            "yes".green()
        } else {
            "no".yellow()
        }
    );
    println!(
        "  Auth:        {}",
        if output.auth_enabled { "enabled" } else { "disabled" }
    );
    println!();
    println!("  Groups:  {}", output.counts.groups);
    println!("  Sites:   {}", output.counts.sites);
    println!("  Configs: {}", output.counts.configs);

    Ok(())
}
