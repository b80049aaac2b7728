//! Logging infrastructure for diagram normalization
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! embedding application's choice. [`init_logging`] is provided for
//! callers that just want sensible output.
//!
//! # Usage
//!
//! ```rust,no_run
//! use mermaid_mend::core::logging::init_logging;
//!
//! // Defaults (info level, compact format), overridable through the environment
//! init_logging(None, None).unwrap();
//! ```
//!
//! # What gets logged
//!
//! - `info`: one event per document and per block outcome
//! - `debug`: every applied fix and every quoted node
//! - `trace`: every node occurrence the scanner visits
//! - `warn`: unrepairable blocks and suspicious input left untouched
//!
//! # Environment Variables
//!
//! - `MERMAID_MEND_LOG_LEVEL`: log level or filter directive
//! - `MERMAID_MEND_LOG_FORMAT`: compact|pretty|json
//! - `RUST_LOG`: standard `tracing-subscriber` filter, takes precedence
//!
//! # Filtering Logs
//!
//! ```bash
//! # Only the node scanner at trace level
//! RUST_LOG="info,mermaid_mend::plugins::flowchart::scanner=trace" my-converter book/
//! ```

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Environment variable holding the log level
pub const LEVEL_ENV: &str = "MERMAID_MEND_LOG_LEVEL";

/// Environment variable holding the log format
pub const FORMAT_ENV: &str = "MERMAID_MEND_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact single-line format
    #[default]
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Resolve level and format from arguments, then environment, then defaults
pub fn resolve_settings(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(String, LogFormat), String> {
    let log_level = level
        .map(|s| s.to_string())
        .or_else(|| std::env::var(LEVEL_ENV).ok())
        .unwrap_or_else(|| "info".to_string());

    let log_format = format
        .map(|s| s.to_string())
        .or_else(|| std::env::var(FORMAT_ENV).ok())
        .map(|s| LogFormat::from_str(&s))
        .transpose()
        .map_err(|e| format!("Invalid log format: {}", e))?
        .unwrap_or_default();

    Ok((log_level, log_format))
}

/// Initialize the global tracing subscriber
///
/// # Arguments
///
/// * `level` - Optional level or filter directive. Falls back to
///   `MERMAID_MEND_LOG_LEVEL`, then `info`. `RUST_LOG` wins when set.
/// * `format` - Optional format (compact|pretty|json). Falls back to
///   `MERMAID_MEND_LOG_FORMAT`, then `compact`.
///
/// # Returns
///
/// An error for an unknown format or when a global subscriber is already set.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (log_level, format) = resolve_settings(level, format)?;

    let filter = build_filter(&log_level);

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_span_events(FmtSpan::NONE)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    };

    Registry::default().with(layer).with(filter).try_init()?;
    Ok(())
}

/// `RUST_LOG` wins over `level`; an unparsable directive falls back to `info`
fn build_filter(level: &str) -> EnvFilter {
    if level == "off" {
        return EnvFilter::new("off");
    }
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging with default settings (info level, compact format)
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}
