//! Error types for the navcat CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 3=not_found, 4=validation, etc.)
//! - Retryability flags
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for navcat operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    NotInitialized,
    DatabaseError,
    DatabaseBusy,
    Conflict,

    // Not Found (exit 3)
    GroupNotFound,
    SiteNotFound,
    ConfigNotFound,

    // Validation (exit 4)
    InvalidArgument,

    // Sync (exit 6)
    SyncError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Auth (exit 9)
    AuthError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseBusy => "DATABASE_BUSY",
            Self::Conflict => "CONFLICT",
            Self::GroupNotFound => "GROUP_NOT_FOUND",
            Self::SiteNotFound => "SITE_NOT_FOUND",
            Self::ConfigNotFound => "CONFIG_NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::SyncError => "SYNC_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::AuthError => "AUTH_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-9).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::NotInitialized | Self::DatabaseError | Self::DatabaseBusy | Self::Conflict => 2,
            Self::GroupNotFound | Self::SiteNotFound | Self::ConfigNotFound => 3,
            Self::InvalidArgument => 4,
            Self::SyncError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
            Self::AuthError => 9,
        }
    }

    /// Whether a caller should retry with corrected input.
    ///
    /// True for validation errors, uniqueness conflicts and busy databases.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument | Self::Conflict | Self::DatabaseBusy
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in navcat operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not initialized: no database at {path}")]
    NotInitialized { path: PathBuf },

    #[error("Group not found: {id}")]
    GroupNotFound { id: i64 },

    #[error("Site not found: {id}")]
    SiteNotFound { id: i64 },

    #[error("Config not found: {key}")]
    ConfigNotFound { key: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sync error: {0}")]
    Sync(#[from] crate::sync::SyncError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(#[from] crate::auth::AuthError),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized { .. } => ErrorCode::NotInitialized,
            Self::Database(e) if is_constraint_violation(e) => ErrorCode::Conflict,
            Self::Database(e) if is_busy(e) => ErrorCode::DatabaseBusy,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::GroupNotFound { .. } => ErrorCode::GroupNotFound,
            Self::SiteNotFound { .. } => ErrorCode::SiteNotFound,
            Self::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Sync(_) => ErrorCode::SyncError,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Auth(_) => ErrorCode::AuthError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotInitialized { .. } => {
                Some("Run `navcat init` to create the database".to_string())
            }

            Self::GroupNotFound { id } => Some(format!(
                "No group with ID {id}. Use `navcat group list` to see available groups."
            )),

            Self::SiteNotFound { id } => Some(format!(
                "No site with ID {id}. Use `navcat site list` to see available sites."
            )),

            Self::ConfigNotFound { key } => Some(format!(
                "No config entry '{key}'. Use `navcat config list` to see stored keys."
            )),

            Self::Database(e) if is_constraint_violation(e) => Some(
                "Group names are unique, and a URL may appear only once per group.".to_string(),
            ),

            Self::Database(e) if is_busy(e) => Some(
                "Another process holds the write lock. Retry, or raise --busy-timeout.".to_string(),
            ),

            Self::Auth(_) => Some(
                "Check AUTH_USERNAME / AUTH_PASSWORD, or log in again if the token expired."
                    .to_string(),
            ),

            Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Sync(_)
            | Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            )
    )
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
