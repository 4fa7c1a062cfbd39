//! Opt-in `tracing` subscriber bootstrap.
//!
//! The engine only ever emits `tracing` events; it never installs a global
//! subscriber itself. This helper exists for embedding binaries and tests
//! that want a reasonable default, the same way kumomta's server crates
//! keep subscriber setup out of library code.

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber reading `RUST_LOG` (default: `info`).
///
/// Safe to call more than once; subsequent calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
