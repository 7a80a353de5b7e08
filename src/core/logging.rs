//! Structured logging setup
//!
//! Installs the global tracing subscriber. Output is JSON or plain text,
//! to stdout or a daily-rotated file, as configured. All writes go through
//! a non-blocking worker so slow sinks never stall request handling.

use crate::core::config::LoggingConfig;
use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Handle to the logging system
///
/// Keep this alive for the lifetime of the process; dropping it flushes
/// and stops the background log writer.
pub struct Logger {
    _guard: WorkerGuard,
}

impl Logger {
    /// Install the global subscriber per the logging configuration
    ///
    /// `RUST_LOG` takes precedence over the configured level when set,
    /// so individual targets can be turned up without a config change.
    pub fn init(config: &LoggingConfig) -> Result<Self> {
        let level = parse_level(&config.level)?;
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

        let (writer, guard) = build_writer(config)?;

        let fmt_layer = match config.format.as_str() {
            "json" => fmt::layer()
                .json()
                .with_writer(writer)
                .with_current_span(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true)
                .boxed(),
            "text" => fmt::layer()
                .with_writer(writer)
                .with_ansi(config.output == "stdout")
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true)
                .boxed(),
            other => anyhow::bail!("unsupported log format: {}", other),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .context("a global tracing subscriber is already installed")?;

        tracing::info!(
            level = %config.level,
            format = %config.format,
            output = %config.output,
            "Logging initialized"
        );

        Ok(Logger { _guard: guard })
    }
}

fn parse_level(value: &str) -> Result<Level> {
    value
        .parse::<Level>()
        .map_err(|_| anyhow::anyhow!("unrecognized log level: {}", value))
}

fn build_writer(config: &LoggingConfig) -> Result<(NonBlocking, WorkerGuard)> {
    match config.output.as_str() {
        "stdout" => Ok(tracing_appender::non_blocking(std::io::stdout())),
        "file" => {
            let log_file = config
                .log_file
                .as_ref()
                .context("log_file must be set when output is 'file'")?;
            let directory = log_file
                .parent()
                .context("log_file must include a directory")?;
            let filename = log_file
                .file_name()
                .context("log_file must include a filename")?;

            std::fs::create_dir_all(directory).context("failed to create log directory")?;

            let appender = tracing_appender::rolling::daily(directory, filename);
            Ok(tracing_appender::non_blocking(appender))
        }
        other => anyhow::bail!("unsupported log output: {}", other),
    }
}
