//! Diagnostic logging setup
//!
//! Library crates emit `tracing` events. They are silent unless `--debug` is
//! given or `SOPSIFY_LOG` holds an env-filter directive.

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "SOPSIFY_LOG";

const DEBUG_DIRECTIVES: &str = "sopsify=debug,sopsify_core=debug,sopsify_engine=debug";

pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if debug {
            EnvFilter::new(DEBUG_DIRECTIVES)
        } else {
            EnvFilter::new("off")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
