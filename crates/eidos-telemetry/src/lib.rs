//! Structured logging for Eidos.
//!
//! Every Eidos crate logs through [`tracing`]. This crate installs the
//! subscriber: JSON lines for production, a pretty multi-line format for
//! development, both written to stderr so stdout stays free for command
//! output.
//!
//! # Example
//!
//! ```rust,no_run
//! use eidos_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development()).expect("logging");
//! tracing::info!(service = "eidos", "ready");
//! ```
//!
//! The `RUST_LOG` variable is not read implicitly; pass directives through
//! [`LogConfig::level`] (e.g. `"info,eidos_multipart=debug"`).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
