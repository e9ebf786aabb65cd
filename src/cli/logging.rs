//! Diagnostic logging on stderr
//!
//! stdout carries results only, so logs never interfere with piping.

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "CURTAIN_LOG";

/// Install the global subscriber. `CURTAIN_LOG` wins over the flags.
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .ok();
}

fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "curtain=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}
