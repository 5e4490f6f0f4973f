//! Logger setup for the simulation binary and tests.
//!
//! Decision tracing goes through the `log` facade. Agents log target
//! switches, releases and retreats at `debug`, per-tick detail at `trace`.
use env_logger::{Builder, Env};

/// Default filter directive: quiet dependencies, chatty controller when
/// `verbose`.
#[must_use]
pub const fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,skirmish=debug"
    } else {
        "info"
    }
}

/// Initializes the global logger.
///
/// `RUST_LOG` overrides the default from [`default_filter`]. Calling this
/// more than once is harmless; later calls are ignored.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // Only fails when a logger is already installed.
    let _ = builder.try_init();
}
