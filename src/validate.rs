//! Input validation for CLI arguments.
//!
//! Storage accepts whatever it is given; these checks run at the command
//! boundary so that bad input fails before a transaction is opened.

use crate::error::{Error, Result};
use crate::model::OrderUpdate;

/// Trim a group name and reject empty names.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the name is blank.
pub fn group_name(input: &str) -> Result<String> {
    let name = input.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("Group name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}

/// Trim a site name and reject empty names.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the name is blank.
pub fn site_name(input: &str) -> Result<String> {
    let name = input.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("Site name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}

/// Trim a URL and reject empty or whitespace-bearing values.
///
/// Any scheme is allowed; bookmarks to `chrome://` or relative paths are
/// legitimate.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the URL is blank or contains spaces.
pub fn url(input: &str) -> Result<String> {
    let url = input.trim();
    if url.is_empty() {
        return Err(Error::InvalidArgument("URL cannot be empty".to_string()));
    }
    if url.chars().any(char::is_whitespace) {
        return Err(Error::InvalidArgument(format!(
            "URL cannot contain whitespace: {url:?}"
        )));
    }
    Ok(url.to_string())
}

/// Reject blank config keys.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the key is blank.
pub fn config_key(input: &str) -> Result<String> {
    let key = input.trim();
    if key.is_empty() {
        return Err(Error::InvalidArgument("Config key cannot be empty".to_string()));
    }
    Ok(key.to_string())
}

/// Parse one `ID=ORDER` reorder argument.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the argument is not two integers
/// joined by `=`.
pub fn order_update(input: &str) -> Result<OrderUpdate> {
    let invalid = || {
        Error::InvalidArgument(format!(
            "Invalid reorder argument '{input}'. Expected ID=ORDER, e.g. 3=0"
        ))
    };

    let (id, order) = input.split_once('=').ok_or_else(invalid)?;
    let id = id.trim().parse::<i64>().map_err(|_| invalid())?;
    let order_num = order.trim().parse::<i64>().map_err(|_| invalid())?;

    Ok(OrderUpdate { id, order_num })
}

/// Parse every reorder argument, failing on the first bad one.
///
/// # Errors
///
/// Returns the first parse error, or an error if no arguments were given.
pub fn order_updates(inputs: &[String]) -> Result<Vec<OrderUpdate>> {
    if inputs.is_empty() {
        return Err(Error::InvalidArgument(
            "At least one ID=ORDER pair is required".to_string(),
        ));
    }
    inputs.iter().map(|s| order_update(s)).collect()
}
