//! Logging configuration using tracing.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging with the specified level.
///
/// With a `log_file`, lines are appended to that file. If it cannot be opened
/// the problem is reported on stderr and logging falls back to stdout.
pub fn init(level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!(
                    "Failed to open log file {}: {} (logging to stdout)",
                    path.display(),
                    e
                );
                None
            }
        }
    });

    let registry = tracing_subscriber::registry().with(filter);

    match file {
        Some(file) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .try_init()?,
        None => registry.with(tracing_subscriber::fmt::layer()).try_init()?,
    }

    Ok(())
}
