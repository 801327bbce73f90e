//! Sets up logging for the binaries.

use std::{fs::OpenOptions, io, path::Path, sync::Arc};

use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Install the global tracing subscriber.
///
/// Logs go to stderr at the level set by `RUST_LOG`, `info` by default. If
/// `log_path` is given, everything at `debug` and above is also appended to
/// that file.
///
/// # Errors
///
/// Returns an error if the log file could not be opened, in which case no
/// subscriber is installed.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init_logging(log_path: Option<&Path>) -> Result<(), io::Error> {
    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let debug_log = match log_path {
        Some(path) => {
            let log_file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .init();

    Ok(())
}
