//! Logging setup for the fixwidth binary
//!
//! Logs go to stderr so that table output on stdout stays clean. The level
//! defaults to `info` (`debug` with `--verbose`) and `RUST_LOG` overrides it,
//! e.g. `RUST_LOG=fixwidth=trace`.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}
