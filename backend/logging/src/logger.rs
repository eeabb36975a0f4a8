//! Structured Logger
//!
//! Wraps `tracing` with a console layer and, when a directory is configured,
//! a daily-rolling file layer (NDJSON or plain text).

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "embedtool.log";

#[derive(Debug, Clone)]
pub struct LoggerOptions {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Directory for rolling log files. `None` logs to the console only.
    pub dir: Option<PathBuf>,
    /// Write the file layer as NDJSON.
    pub json: bool,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            level: "info".into(),
            dir: None,
            json: true,
        }
    }
}

/// Initialize the global subscriber. Calling it twice is harmless; the second
/// call leaves the first subscriber in place.
pub fn init_logger(opts: &LoggerOptions) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&opts.level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_ansi(true);

    let file_layer = match &opts.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            // Writes `embedtool.log.YYYY-MM-DD`
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
            let layer = if opts.json {
                fmt::layer().json().with_writer(appender).with_ansi(false).boxed()
            } else {
                fmt::layer().with_writer(appender).with_ansi(false).boxed()
            };
            Some(layer)
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}
