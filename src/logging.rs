//! File logging. The TUI owns stdout, so nothing is written to the console.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LOG_DIR: &str = "logs";
const LOG_FILE_NAME: &str = "exam-prep.log";
const DEFAULT_FILTER: &str = "info,exam_prep=debug";

/// Install the global subscriber writing to a daily-rotated file in `log_dir`.
///
/// `RUST_LOG` overrides the default filter. Keep the returned guard alive for
/// the life of the process or buffered lines are lost.
pub fn init(log_dir: &Path) -> io::Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(non_blocking_file);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)?;

    tracing::info!(log_dir = %log_dir.display(), "logging initialized");
    Ok(guard)
}
