//! Console and run log file output.
//!
//! Both sinks share one filter. The file sink rotates daily and keeps the
//! most recent files, so completion warnings stay available after the
//! console scrollback is gone.

use crate::config::LogLevel;
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, format, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Number of rotated log files kept on disk
pub const MAX_LOG_FILES: usize = 7;

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped and must be held
/// until the program exits.
pub fn init(level: LogLevel, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("slides_translate={}", level.as_str()).parse()?);

    let (file, guard) = match log_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            (Some(file_layer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file)
        .init();

    Ok(guard)
}

/// Daily rolling appender for `path`.
///
/// `logs/run.log` is written as `logs/run.YYYY-MM-DD.log`.
pub fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let Some(prefix) = path.file_stem().and_then(|s| s.to_str()) else {
        bail!("Log file path has no file name: {}", path.display());
    };
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(MAX_LOG_FILES);
    if let Some(suffix) = path.extension().and_then(|s| s.to_str()) {
        builder = builder.filename_suffix(suffix);
    }

    builder
        .build(directory)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Plain-text formatting layer for the run log.
pub fn file_layer<S, W>(writer: W) -> fmt::Layer<S, format::DefaultFields, format::Format, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fmt::layer().with_ansi(false).with_writer(writer)
}
