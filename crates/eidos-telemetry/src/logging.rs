//! Structured logging setup.
//!
//! # Example
//!
//! ```rust,ignore
//! use eidos_telemetry::logging::{LogConfig, init_logging};
//!
//! init_logging(&LogConfig::production())?;
//!
//! tracing::info!(part_index = 0, field = "title", "decoded field");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directives (e.g., "info", "warn,eidos_multipart=debug").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to colorize pretty output.
    pub ansi: bool,

    /// Whether to include span events (new, close).
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Service name attached to the root span by binaries.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            ansi: true,
            span_events: true,
            file_line_info: true,
            thread_ids: false,
            include_target: true,
            service_name: "eidos".to_string(),
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            ansi: false,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
            service_name: "eidos".to_string(),
        }
    }

    /// Sets the filter directives.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

/// Installs the global subscriber.
///
/// Does nothing when `config.enabled` is false.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for bad directives and
/// [`TelemetryError::LoggingInit`] if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_ansi(config.ansi)
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

/// Creates an env filter from directives.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] if the directives do not parse.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter {
        filter: filter.to_string(),
        reason: e.to_string(),
    })
}

/// Standard log field names.
///
/// Use these field names for consistency across logs.
pub mod fields {
    /// Request ID field name.
    pub const REQUEST_ID: &str = "request_id";

    /// HTTP method field name.
    pub const HTTP_METHOD: &str = "http.method";

    /// Zero-based index of a multipart part.
    pub const PART_INDEX: &str = "part_index";

    /// Form field name.
    pub const FIELD: &str = "field";

    /// Original upload file name.
    pub const FILE_NAME: &str = "file_name";

    /// Size in bytes.
    pub const SIZE: &str = "size";

    /// Configured limit in bytes.
    pub const LIMIT: &str = "limit";

    /// Error field name.
    pub const ERROR: &str = "error";

    /// Service name field name.
    pub const SERVICE_NAME: &str = "service.name";
}

/// Logs a decoded form summary.
#[macro_export]
macro_rules! log_form_decoded {
    ($request_id:expr, $fields:expr, $files:expr, $rejected:expr) => {
        tracing::info!(
            request_id = %$request_id,
            fields = $fields,
            files = $files,
            rejected = $rejected,
            "Multipart form decoded"
        );
    };
}
