//! SQLite storage layer for navcat.
//!
//! This module provides the persistence layer using SQLite with:
//! - Foreign keys with cascade delete of sites
//! - Uniqueness on group name and on (group, url)
//! - Transaction discipline for atomic writes
//!
//! # Submodules
//!
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main SQLite storage implementation

pub mod schema;
pub mod sqlite;

pub use sqlite::{CatalogCounts, InitOutcome, SiteUpsert, SqliteStorage};
