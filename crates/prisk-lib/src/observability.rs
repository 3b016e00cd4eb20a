//! Structured logging setup
//!
//! Logging is off unless asked for, since stderr is reserved for the single
//! failure line in normal operation.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logging options taken from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct LogConfig {
    /// Number of `-v` flags
    pub verbosity: u8,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl LogConfig {
    /// Filter directive for the configured verbosity
    pub fn directive(&self) -> &'static str {
        match self.verbosity {
            0 => "off",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Install the global tracing subscriber, writing to stderr
pub fn init_tracing(config: LogConfig) {
    let filter = EnvFilter::new(config.directive());
    let registry = tracing_subscriber::registry().with(filter);

    // A subscriber may already be installed when embedded; keep that one
    let _ = if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
}
