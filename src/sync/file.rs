//! Atomic file operations for envelopes.
//!
//! - Atomic writes: write to temp file, sync to disk, then rename
//! - Envelope reading with typed errors for missing files and bad JSON

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::sync::types::{ExportEnvelope, SyncError, SyncResult};

/// Write content to a file atomically.
///
/// This function:
/// 1. Writes content to a temporary file (same path with `.tmp` extension)
/// 2. Calls `fsync` to ensure data is on disk
/// 3. Atomically renames the temp file to the target path
///
/// If any step fails, the original file (if any) remains untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &str) -> SyncResult<()> {
    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Serialize an envelope as pretty JSON and write it atomically.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_envelope(path: &Path, envelope: &ExportEnvelope) -> SyncResult<()> {
    let mut content = serde_json::to_string_pretty(envelope)?;
    content.push('\n');
    atomic_write(path, &content)
}

/// Read an envelope from a JSON file.
///
/// # Errors
///
/// Returns [`SyncError::FileNotFound`] if the file does not exist, or a
/// JSON error if it is not a valid envelope.
pub fn read_envelope(path: &Path) -> SyncResult<ExportEnvelope> {
    if !path.exists() {
        return Err(SyncError::FileNotFound(path.display().to_string()));
    }

    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
