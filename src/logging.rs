//! Logging infrastructure
//!
//! Logs go to a daily-rotated file under the data directory's `log/`
//! subdirectory. The level comes from `RUST_LOG` when set, otherwise from the
//! `level` argument.

use anyhow::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::persistence::log_dir;

/// Initialize the logging system. Call once at startup and keep the returned
/// guard alive for the process lifetime.
pub fn init(level: &str) -> Result<LoggingGuard> {
    let dir = log_dir()?;
    std::fs::create_dir_all(&dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &dir, "dayline.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    tracing::info!(log_dir = %dir.display(), %level, "logging initialized");

    Ok(LoggingGuard { _guard: guard })
}

/// Initialize logging for tests (logs to the test writer)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Guard that keeps the logging worker alive; dropping it flushes pending
/// writes
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}
