//! Logging infrastructure for diagram conversion
//!
//! Structured logging uses the `tracing` crate. Native builds install a
//! `tracing-subscriber` registry; WASM builds log to the browser console
//! through `tracing-wasm`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use netjson::core::logging::init_logging;
//!
//! init_logging(Some("debug"), Some("pretty")).unwrap();
//! ```
//!
//! # Log Formats
//!
//! - `compact`: Single-line format
//! - `pretty`: Multi-line format with colors
//! - `json`: JSON format for log aggregation
//!
//! # Environment Variables
//!
//! - `NETJSON_LOG_LEVEL`: log level (trace|debug|info|warn|error|off)
//! - `RUST_LOG`: standard `EnvFilter` directives, e.g.
//!   `RUST_LOG="info,netjson::shapes::compiler=trace"`
//! - `NETJSON_LOG_FORMAT`: compact|pretty|json
//!
//! Skipped elements (unresolvable shapes, unknown drawing instructions,
//! dangling wires) are reported at `warn`, so the default `info` level
//! shows them.

use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

#[cfg(target_arch = "wasm32")]
use tracing_wasm::WASMLayerConfig;

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
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

/// Logging settings resolved from explicit arguments and the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directive string, or `off`
    pub directives: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// Resolve settings: explicit argument, then `NETJSON_LOG_*`, then
    /// `RUST_LOG` (level only), then `info` / `compact`.
    pub fn resolve(level: Option<&str>, format: Option<&str>) -> Result<Self, String> {
        let directives = level
            .map(str::to_string)
            .or_else(|| std::env::var("NETJSON_LOG_LEVEL").ok())
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string());

        let format = format
            .map(str::to_string)
            .or_else(|| std::env::var("NETJSON_LOG_FORMAT").ok())
            .unwrap_or_else(|| "compact".to_string());

        Ok(Self {
            directives,
            format: LogFormat::from_str(&format)
                .map_err(|e| format!("Invalid log format: {}", e))?,
        })
    }
}

/// Initialize the tracing subscriber with the given log level and format
///
/// `level` is an `EnvFilter` directive (`debug`, `warn,netjson::shapes=trace`,
/// `off`); an unparseable directive falls back to `info`. `format` is one of
/// [`LogFormat::variants`]. Either argument may be `None` to read the
/// environment.
///
/// Returns an error for an unknown format or when a global subscriber is
/// already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_arch = "wasm32")]
    {
        // Browser console only; level and format are not configurable there
        let _ = (level, format);
        tracing_wasm::set_as_global_default_with_config(WASMLayerConfig::default());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let settings = LogSettings::resolve(level, format)?;
        let filter = EnvFilter::try_new(&settings.directives)
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = Registry::default().with(filter);

        match settings.format {
            LogFormat::Compact => registry
                .with(
                    fmt::Layer::default()
                        .with_target(false)
                        .with_writer(std::io::stderr)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init()?,
            LogFormat::Pretty => registry
                .with(
                    fmt::Layer::default()
                        .with_file(true)
                        .with_line_number(true)
                        .with_writer(std::io::stderr)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?,
            LogFormat::Json => registry
                .with(
                    fmt::Layer::default()
                        .with_file(true)
                        .with_line_number(true)
                        .with_writer(std::io::stderr)
                        .with_span_events(FmtSpan::CLOSE)
                        .json(),
                )
                .try_init()?,
        }

        Ok(())
    }
}

/// Initialize logging at `warn` in compact format, for library callers
/// that only want to see skipped elements.
pub fn init_quiet_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(Some("warn"), Some("compact"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::from_str("Pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("yaml").is_err());
    }

    #[test]
    fn test_explicit_settings_win() {
        let settings = LogSettings::resolve(Some("debug"), Some("json")).unwrap();
        assert_eq!(settings.directives, "debug");
        assert_eq!(settings.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_format_rejected() {
        let result = LogSettings::resolve(Some("info"), Some("xml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid log format"));
    }
}
