//! Configuration management.
//!
//! This module resolves where the database lives and reads the auth
//! settings. Nothing here touches the database itself.
//!
//! # Database location
//!
//! A single global database at `~/.navcat/data/navcat.db`, unless overridden
//! by `--db` or `NAVCAT_DB`.
//!
//! # Auth
//!
//! `AUTH_ENABLED`, `AUTH_USERNAME`, `AUTH_PASSWORD` and `AUTH_SECRET` are read
//! from the environment.

use crate::error::{Error, Result};
use crate::storage::SqliteStorage;

use std::path::{Path, PathBuf};

/// Signing secret used when `AUTH_SECRET` is unset.
pub const DEFAULT_AUTH_SECRET: &str = "DefaultSecretKey";

/// Get the global navcat directory location (`~/.navcat/`).
#[must_use]
pub fn global_navcat_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".navcat"))
}

/// Resolve the database path.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly
/// 2. `NAVCAT_DB` environment variable
/// 3. Global location: `~/.navcat/data/navcat.db`
///
/// # Returns
///
/// Returns the path to the database file, or `None` if no location found.
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(db_path) = std::env::var("NAVCAT_DB") {
        if !db_path.trim().is_empty() {
            return Some(PathBuf::from(db_path));
        }
    }

    global_navcat_dir().map(|dir| dir.join("data").join("navcat.db"))
}

/// Open an existing database.
///
/// Commands other than `init` refuse to create a database implicitly.
///
/// # Errors
///
/// Returns [`Error::NotInitialized`] if the file does not exist, or a
/// database error if it cannot be opened.
pub fn open_existing(explicit_path: Option<&Path>, busy_timeout_ms: Option<u64>) -> Result<SqliteStorage> {
    let db_path = resolve_db_path(explicit_path)
        .ok_or_else(|| Error::Config("Could not determine database location".to_string()))?;

    if !db_path.exists() {
        return Err(Error::NotInitialized { path: db_path });
    }

    SqliteStorage::open_with_timeout(&db_path, busy_timeout_ms)
}

/// Login settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// When false, every login succeeds as `guest` and every token verifies.
    pub enabled: bool,
    pub username: String,
    pub password: String,
    /// HMAC key for issued tokens.
    pub secret: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            username: String::new(),
            password: String::new(),
            secret: DEFAULT_AUTH_SECRET.to_string(),
        }
    }
}

impl AuthSettings {
    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup (used by tests).
    ///
    /// Only the exact string `"true"` enables auth.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("AUTH_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_AUTH_SECRET.to_string());

        Self {
            enabled: lookup("AUTH_ENABLED").as_deref() == Some("true"),
            username: lookup("AUTH_USERNAME").unwrap_or_default(),
            password: lookup("AUTH_PASSWORD").unwrap_or_default(),
            secret,
        }
    }
}
