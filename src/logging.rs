// src/logging.rs
// =============================================================================
// Structured logging setup.
//
// Logs go to stderr: stdout is reserved for the page bodies. The level comes
// from RUST_LOG and defaults to "info", which prints one line per request.
//
// Examples:
//   RUST_LOG=debug gitlab-cli ...  -> also logs status and x-total-pages
//   RUST_LOG=off gitlab-cli ...    -> only fatal errors (printed by main.rs)
//
// Rust concepts:
// - Global subscriber: tracing macros anywhere in the crate end up here
// - Function pointers: std::io::stderr is passed as the writer factory
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

// Initialize the global tracing subscriber, writing to stderr
//
// Returns:
//   Error: if a subscriber was already installed
pub fn init_logging() -> Result<()> {
    // Fall back to "info" when RUST_LOG is unset or invalid
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    Ok(())
}
