//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use std::path::PathBuf;

use eidos_multipart::{parse_byte_size, ByteSizeError, DEFAULT_MAX_NESTING_DEPTH};
use eidos_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

/// Upload handling section.
///
/// # Example
///
/// ```
/// use eidos_config::UploadsConfig;
///
/// let config = UploadsConfig {
///     max_filesize: "8M".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(config.max_filesize_bytes().unwrap(), 8 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UploadsConfig {
    /// Per-file upload ceiling, an integer with optional K/M/G suffix.
    #[serde(default = "default_max_filesize")]
    pub max_filesize: String,

    /// Directory for temporary upload files. Unset uses the OS temp dir.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// Maximum bracket nesting depth of field names.
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            max_filesize: default_max_filesize(),
            temp_dir: None,
            max_nesting_depth: default_max_nesting_depth(),
        }
    }
}

impl UploadsConfig {
    /// Returns the upload ceiling in bytes.
    ///
    /// # Errors
    ///
    /// Returns the size parse error for malformed values.
    pub fn max_filesize_bytes(&self) -> Result<u64, ByteSizeError> {
        parse_byte_size(&self.max_filesize)
    }
}

fn default_max_filesize() -> String {
    "2M".to_string()
}

fn default_max_nesting_depth() -> usize {
    DEFAULT_MAX_NESTING_DEPTH
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directives.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts to the subscriber settings used by `eidos-telemetry`.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let base = match self.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };

        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            json_format: self.format == LogFormat::Json,
            ansi: self.ansi_enabled,
            file_line_info: self.include_location,
            ..base
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uploads_defaults() {
        let config = UploadsConfig::default();
        assert_eq!(config.max_filesize, "2M");
        assert_eq!(config.max_filesize_bytes().unwrap(), 2 * 1024 * 1024);
        assert_eq!(config.temp_dir, None);
        assert_eq!(config.max_nesting_depth, 64);
    }

    #[test]
    fn test_uploads_partial_toml() {
        let config: UploadsConfig = toml::from_str(r#"max_filesize = "512k""#).unwrap();
        assert_eq!(config.max_filesize_bytes().unwrap(), 512 * 1024);
        assert_eq!(config.max_nesting_depth, 64);
    }

    #[test]
    fn test_uploads_unknown_field_rejected() {
        let result: Result<UploadsConfig, _> = toml::from_str("max_size = 10");
        assert!(result.is_err());
    }

    #[test]
    fn test_log_format_serde() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);

        let format: LogFormat = serde_json::from_str(r#""pretty""#).unwrap();
        assert_eq!(format, LogFormat::Pretty);
    }

    #[test]
    fn test_logging_defaults() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_log_config_conversion() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            ansi_enabled: true,
            include_location: true,
            ..Default::default()
        };

        let log = config.log_config();
        assert!(log.enabled);
        assert_eq!(log.level, "debug");
        assert!(!log.json_format);
        assert!(log.ansi);
        assert!(log.file_line_info);
        assert_eq!(log.service_name, "eidos");
    }
}
