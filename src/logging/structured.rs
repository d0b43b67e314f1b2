//! Subscriber setup for Folio
//!
//! Two layers share one filter recipe:
//!
//! - stderr, compact: one line per event prefixed with the active `render`
//!   span, e.g. `render{report_id=visits locale=en_US actor=-}: Report rendered`
//! - `folio.log` (optional), JSON lines: every event carries the fields of
//!   its `render` span under `span`, and the span's close event records how
//!   long the report took
//!
//! `FOLIO_LOG` overrides the filter with `EnvFilter` directives. Otherwise
//! Folio logs at the requested level and other crates at `warn`.
//!
//! # Example
//!
//! ```no_run
//! use folio::logging::init_logging;
//! use folio::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//! ```

use crate::config::LoggingConfig;
use crate::domain::{FolioError, Result};
use std::fmt;
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable holding filter directives
pub const FILTER_ENV: &str = "FOLIO_LOG";

const LOG_FILE_PREFIX: &str = "folio.log";

/// Keeps the file writer alive; dropping it flushes pending lines
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    // Directory of `folio.log`, shown in Debug output
    log_dir: Option<String>,
}

impl fmt::Debug for LoggingGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingGuard")
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

/// Installs the global subscriber
///
/// # Errors
///
/// [`FolioError::Configuration`] for an unknown level or rotation, or when
/// the log directory cannot be created.
pub fn init_logging(log_level_str: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(log_level_str)?;

    let mut layers = vec![console_layer().with_filter(filter(level)).boxed()];

    let (file_guard, log_dir) = if config.local_enabled {
        let rotation = parse_rotation(&config.local_rotation)?;
        std::fs::create_dir_all(&config.local_path).map_err(|e| {
            FolioError::Configuration(format!(
                "Failed to create log directory {}: {}",
                config.local_path, e
            ))
        })?;

        let appender = RollingFileAppender::new(rotation, &config.local_path, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        layers.push(json_layer(writer).with_filter(filter(level)).boxed());
        (Some(guard), Some(config.local_path.clone()))
    } else {
        (None, None)
    };

    tracing_subscriber::registry().with(layers).init();

    tracing::debug!(
        level = %level,
        log_dir = log_dir.as_deref().unwrap_or("-"),
        rotation = %config.local_rotation,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
        log_dir,
    })
}

fn console_layer<S>() -> impl Layer<S> + Send + Sync + 'static
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
}

fn json_layer<S, W>(writer: W) -> impl Layer<S> + Send + Sync + 'static
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(writer)
}

fn filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

fn default_directives(level: Level) -> String {
    format!("warn,folio={}", level.to_string().to_lowercase())
}

fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(FolioError::Configuration(format!(
            "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
            level_str
        ))),
    }
}

fn parse_rotation(rotation: &str) -> Result<Rotation> {
    match rotation {
        "daily" => Ok(Rotation::DAILY),
        "hourly" => Ok(Rotation::HOURLY),
        other => Err(FolioError::Configuration(format!(
            "Invalid log rotation: {other}. Must be one of: daily, hourly"
        ))),
    }
}
