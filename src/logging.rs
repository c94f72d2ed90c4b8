//! Diagnostics output
//!
//! Warnings about skipped directories, symlinks and files are emitted through
//! `tracing` and printed on stderr, keeping stdout free for results.

use anyhow::{anyhow, Result};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `ctxpack=debug`
pub const LOG_ENV: &str = "CTXPACK_LOG";

/// Logging switches taken from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    pub verbose: bool,
    pub quiet: bool,
    pub no_color: bool,
}

impl LogOptions {
    /// Default level when `CTXPACK_LOG` is unset
    pub fn level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

/// Install the global stderr subscriber
pub fn init_logging(opts: LogOptions) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(opts.level()));
    let ansi = !opts.no_color && std::io::stderr().is_terminal();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_selection() {
        assert_eq!(LogOptions::default().level(), "warn");
        let verbose = LogOptions {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(verbose.level(), "debug");
        let quiet = LogOptions {
            quiet: true,
            verbose: true,
            ..Default::default()
        };
        assert_eq!(quiet.level(), "error");
    }
}
