//! Tracing subscriber setup for binaries and demos.

use tracing_subscriber::EnvFilter;

use crate::config::ExecutionMode;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise development logs at `debug` and
/// production at `warn`. Calling this again after a subscriber is installed
/// is a no-op.
pub fn init(mode: ExecutionMode) {
    let fallback = if mode.is_development() { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
