//! Typed configuration for Eidos.
//!
//! This crate provides a strongly-typed configuration system with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`EidosConfig`] holds two sections:
//!
//! - [`UploadsConfig`] - upload ceiling, temp directory, nesting limit
//! - [`LoggingConfig`] - log level, format and colors
//!
//! # Example
//!
//! ```no_run
//! use eidos_config::ConfigLoader;
//! use eidos_multipart::MultipartParser;
//!
//! # fn main() -> Result<(), eidos_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("eidos.toml")?
//!     .with_env_prefix("EIDOS")
//!     .load()?;
//!
//! let parser = MultipartParser::new(config.parser_config()?);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [uploads]
//! max_filesize = "2M"
//! temp_dir = "/var/tmp/eidos"
//! max_nesting_depth = 64
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ansi_enabled = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden via environment variables using the format
//! `PREFIX__SECTION__KEY`, for example:
//!
//! - `EIDOS__UPLOADS__MAX_FILESIZE=8M`
//! - `EIDOS__UPLOADS__TEMP_DIR=/var/tmp/eidos`
//! - `EIDOS__LOGGING__FORMAT=pretty`

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::EidosConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LogFormat, LoggingConfig, UploadsConfig};
