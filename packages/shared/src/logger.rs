//! Logging setup utilities.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive for the given crate targets.
///
/// Crate names are normalized to module path form (`-` becomes `_`), so
/// `"chanoma-server"` yields `chanoma_server=<level>`.
pub fn default_directive(targets: &[&str], default_log_level: &str) -> String {
    targets
        .iter()
        .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise every crate in `targets` logs at
/// `default_log_level`.
///
/// # Examples
///
/// ```no_run
/// use chanoma_shared::logger::setup_logger;
///
/// setup_logger(&["chanoma-server", "chanoma_server"], "debug");
/// ```
pub fn setup_logger(targets: &[&str], default_log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(targets, default_log_level).into());

    // Ignore the error when a global subscriber is already installed (tests).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
