//! Tracing initialization utilities.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Maps a `-v` count to a tracing level.
///
/// - 0: WARN
/// - 1: INFO
/// - 2: DEBUG
/// - 3+: TRACE
#[must_use]
pub const fn verbosity_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize the tracing subscriber with the given verbosity level.
///
/// Logs go to stderr so that task output on stdout stays clean. The
/// `RUST_LOG` environment variable can be used to override the default filter.
///
/// # Panics
///
/// This function will panic if a global tracing subscriber has already been set.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_level(verbosity).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_thread_ids(false))
        .init();
}
