//! Main configuration type.

use eidos_multipart::ParserConfig;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, LoggingConfig, UploadsConfig};

/// Complete Eidos configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use eidos_config::EidosConfig;
///
/// let config = EidosConfig::default();
/// assert_eq!(config.uploads.max_filesize, "2M");
///
/// let parser = config.parser_config().unwrap();
/// assert_eq!(parser.upload_max_filesize, 2 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct EidosConfig {
    /// Upload handling.
    #[serde(default)]
    pub uploads: UploadsConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EidosConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `uploads.max_filesize` is not a valid size
    /// - `uploads.temp_dir` is set but is not an existing directory
    /// - `uploads.max_nesting_depth` is zero
    /// - `logging.level` is not a valid filter
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.uploads
            .max_filesize_bytes()
            .map_err(|e| ConfigError::invalid_value("uploads.max_filesize", e.to_string()))?;

        if let Some(dir) = &self.uploads.temp_dir {
            if !dir.is_dir() {
                return Err(ConfigError::invalid_value(
                    "uploads.temp_dir",
                    format!("not an existing directory: {}", dir.display()),
                ));
            }
        }

        if self.uploads.max_nesting_depth == 0 {
            return Err(ConfigError::invalid_value(
                "uploads.max_nesting_depth",
                "must be at least 1",
            ));
        }

        if self.logging.enabled {
            eidos_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty, colored debug logs with source locations.
    ///
    /// # Example
    ///
    /// ```
    /// use eidos_config::EidosConfig;
    ///
    /// let config = EidosConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;

        config
    }

    /// Create a production configuration preset.
    ///
    /// JSON logs at info level.
    ///
    /// # Example
    ///
    /// ```
    /// use eidos_config::{EidosConfig, LogFormat};
    ///
    /// let config = EidosConfig::production();
    /// assert_eq!(config.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;

        config
    }

    /// Builds the parser configuration from the `uploads` section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `uploads.max_filesize` does not
    /// parse.
    pub fn parser_config(&self) -> Result<ParserConfig, ConfigError> {
        let max_filesize = self
            .uploads
            .max_filesize_bytes()
            .map_err(|e| ConfigError::invalid_value("uploads.max_filesize", e.to_string()))?;

        let mut parser = ParserConfig::new()
            .upload_max_filesize(max_filesize)
            .max_nesting_depth(self.uploads.max_nesting_depth);
        if let Some(dir) = &self.uploads.temp_dir {
            parser = parser.temp_dir(dir.clone());
        }

        Ok(parser)
    }
}
