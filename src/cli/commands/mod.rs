//! Command implementations.

pub mod auth;
pub mod completions;
pub mod config;
pub mod export;
pub mod group;
pub mod import;
pub mod init;
pub mod site;
pub mod status;
pub mod version;
