//! Export command implementation.
//!
//! Without `--output` the envelope goes to stdout as JSON regardless of
//! `--json`, so it can be piped straight into another instance's import.

use crate::config::open_existing;
use crate::error::Result;
use crate::sync::Exporter;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct ExportOutput {
    path: PathBuf,
    groups: usize,
    sites: usize,
    configs: usize,
    export_date: String,
}

/// Execute the export command.
///
/// # Errors
///
/// Returns an error if the database is missing or the file cannot be written.
pub fn execute(
    output: Option<&Path>,
    db_path: Option<&Path>,
    busy_timeout: Option<u64>,
    json: bool,
) -> Result<()> {
    let storage = open_existing(db_path, busy_timeout)?;
    let exporter = Exporter::new(&storage);

    let Some(path) = output else {
        let envelope = exporter.export()?;
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    };

    let envelope = exporter.write_to(path)?;

    if json {
        let out = ExportOutput {
            path: path.to_path_buf(),
            groups: envelope.groups.len(),
            sites: envelope.sites.len(),
            configs: envelope.configs.len(),
            export_date: envelope.export_date,
        };
        println!("{}", serde_json::to_string(&out)?);
    } else {
        println!("Export complete:");
        println!("  Groups:  {}", envelope.groups.len());
        println!("  Sites:   {}", envelope.sites.len());
        println!("  Configs: {}", envelope.configs.len());
        println!();
        println!("Wrote {}", path.display());
    }

    Ok(())
}
