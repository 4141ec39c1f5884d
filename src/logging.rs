//! Log output for the CLI
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the binary.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter directive for a `-v` count
pub fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Pick the filter: `RUST_LOG` first, then the configured directive, then verbosity
pub fn env_filter(config_filter: Option<&str>, verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        config_filter
            .and_then(|directive| EnvFilter::try_new(directive).ok())
            .unwrap_or_else(|| EnvFilter::new(verbosity_filter(verbose)))
    })
}

/// Install the global subscriber, writing to stderr so stdout stays parseable
pub fn init_logging(config_filter: Option<&str>, verbose: u8) {
    fmt()
        .with_env_filter(env_filter(config_filter, verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
