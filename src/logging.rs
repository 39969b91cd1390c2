//! File logging for the TUI. The terminal belongs to ratatui, so nothing
//! is ever written to stdout/stderr; logs go to a daily-rolling file under
//! the platform data directory. Level is controlled by `KOSTPLAN_LOG`.

use std::path::PathBuf;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Returns a guard that must stay alive for the duration of the program,
/// otherwise buffered log lines are dropped on exit.
pub fn init() -> Result<WorkerGuard> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "kostplan.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_env("KOSTPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("kostplan=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    tracing::info!(log_dir = %log_dir.display(), "kostplan starting");

    Ok(guard)
}

fn log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("kostplan").join("logs")
}
