//! Diagnostic logging setup
//!
//! Logs go to stderr so that stdout only carries the install report.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "rulekit=warn";
const DEBUG_FILTER: &str = "rulekit=debug";

/// Install the global tracing subscriber.
///
/// `--debug` forces debug output for rulekit; otherwise `RUST_LOG` is used,
/// falling back to warnings only.
pub fn init(debug: bool) {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter(debug))
        .init();
}

fn filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
