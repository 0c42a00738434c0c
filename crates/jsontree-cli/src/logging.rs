//! Logging setup for the `jsontree` binary.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `JSONTREE_LOG=debug`.
pub const LOG_ENV: &str = "JSONTREE_LOG";

/// Install a stderr `fmt` subscriber. Defaults to `warn` when the filter
/// variable is unset or invalid, so stdout stays clean for piping.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
