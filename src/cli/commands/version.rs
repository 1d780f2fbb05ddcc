//! Version command implementation.

use crate::error::Result;
use crate::sync::ENVELOPE_VERSION;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
    envelope_version: &'a str,
}

/// Print the crate version, build profile and the envelope format version.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let output = VersionOutput {
        version: env!("CARGO_PKG_VERSION"),
        build: if cfg!(debug_assertions) { "dev" } else { "release" },
        envelope_version: ENVELOPE_VERSION,
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "navcat {} ({}), envelope format {}",
            output.version, output.build, output.envelope_version
        );
    }
    Ok(())
}
