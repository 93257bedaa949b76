//! Tracing subscriber setup
//!
//! The interactive screen owns the terminal, so diagnostics go to a log file.
//! Shared by the binary and the integration tests.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Default log file location, in the system temp directory
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("treepick.log")
}

/// Initialize the global tracing subscriber writing to `log_file_path`.
///
/// Filtering comes from `RUST_LOG` with a DEBUG default. Returns false when
/// the log file cannot be created or a subscriber is already installed; the
/// tool keeps running without logs in that case.
pub fn init_global(log_file_path: &Path) -> bool {
    let Ok(log_file) = File::create(log_file_path) else {
        return false;
    };

    build_subscriber(log_file).try_init().is_ok()
}

/// Build a subscriber writing formatted events to `log_file`.
pub fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::from_default_env()
        .add_directive(tracing::Level::DEBUG.into())
        // notify's inotify backend is chatty at debug
        .add_directive("notify=info".parse().unwrap());

    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}
