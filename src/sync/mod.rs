//! Catalog export and import.
//!
//! - **Export**: whole database → one versioned JSON envelope
//! - **Import**: envelope → database, reconciled on natural keys
//!
//! # File Format
//!
//! ```json
//! {"groups":[...],"sites":[...],"configs":{"theme":"dark"},"version":"1.0","exportDate":"2025-01-20T10:00:00.000Z"}
//! ```
//!
//! # Example
//!
//! ```ignore
//! use navcat::sync::{Exporter, Importer, read_envelope};
//!
//! let envelope = Exporter::new(&source).export()?;
//! let result = Importer::new(&mut destination).import(&envelope);
//! assert!(result.success);
//! ```

mod export;
mod file;
mod import;
mod types;

pub use export::Exporter;
pub use file::{atomic_write, read_envelope, write_envelope};
pub use import::Importer;
pub use types::{
    ENVELOPE_VERSION, ExportEnvelope, GroupStats, ImportResult, ImportStats, SiteStats, SyncError,
    SyncResult,
};
