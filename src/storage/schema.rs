//! Database schema definitions.
//!
//! Three tables: `groups`, `sites` (children of groups) and `configs`.
//! Timestamps are stored as RFC 3339 TEXT written by the application.

use rusqlite::{Connection, Result};

/// The complete SQL schema for the navcat database.
///
/// Group names are unique, and a URL appears at most once per group. The
/// import reconciler relies on both constraints for its insert-or-get
/// writes.
pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS groups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    order_num INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_groups_order ON groups(order_num);

CREATE TABLE IF NOT EXISTS sites (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    group_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    url TEXT NOT NULL,
    icon TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    notes TEXT NOT NULL DEFAULT '',
    order_num INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE,
    UNIQUE(group_id, url)
);

CREATE INDEX IF NOT EXISTS idx_sites_group ON sites(group_id);
CREATE INDEX IF NOT EXISTS idx_sites_order ON sites(order_num);

CREATE TABLE IF NOT EXISTS configs (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// Apply connection pragmas and the schema.
///
/// Idempotent; safe to call on every open.
///
/// # Errors
///
/// Returns an error if a pragma or DDL statement fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
