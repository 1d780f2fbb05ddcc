//! navcat - bookmark catalog with mergeable export/import
//!
//! This crate provides the core functionality for the `navcat` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Group, Site, ConfigEntry)
//! - [`storage`] - SQLite database layer
//! - [`sync`] - Envelope export and import reconciliation
//! - [`auth`] - Login and signed token verification
//! - [`config`] - Database path and auth settings
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod sync;
pub mod validate;

pub use error::{Error, Result};
