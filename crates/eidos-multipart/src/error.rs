//! Parse error types.
//!
//! Errors in this crate never cross the [`MultipartParser::parse`] boundary:
//! a [`PartError`] rejects a single part and is recorded on the result, while
//! size and storage problems are reported through
//! [`UploadErrorCode`](crate::UploadErrorCode) on the file descriptor.
//!
//! [`MultipartParser::parse`]: crate::MultipartParser::parse

use thiserror::Error;

/// Reason a single multipart part was rejected.
///
/// A rejected part contributes nothing to the result; parsing continues with
/// the next part.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartError {
    /// No blank line separates the header block from the content.
    #[error("part has no blank line between headers and content")]
    MissingHeaderDelimiter,

    /// The part carries no `Content-Disposition` header.
    #[error("part has no content-disposition header")]
    MissingContentDisposition,

    /// The `Content-Disposition` value does not match
    /// `form-data; name="..."[; filename="..."]`.
    #[error("unrecognized content-disposition: {value}")]
    InvalidContentDisposition {
        /// The header value as received.
        value: String,
    },

    /// The field name yields no usable key (e.g. empty base name).
    #[error("field name '{name}' does not produce a usable key")]
    InvalidFieldName {
        /// The field name as received.
        name: String,
    },

    /// The field name nests deeper than the configured limit.
    #[error("field name '{name}' nests {depth} levels deep (max {max})")]
    NestingTooDeep {
        /// The field name as received.
        name: String,
        /// Number of bracket segments in the name.
        depth: usize,
        /// Configured maximum.
        max: usize,
    },
}

impl PartError {
    /// Creates an invalid content-disposition error.
    pub fn invalid_disposition(value: impl Into<String>) -> Self {
        Self::InvalidContentDisposition {
            value: value.into(),
        }
    }

    /// Creates an invalid field name error.
    pub fn invalid_field_name(name: impl Into<String>) -> Self {
        Self::InvalidFieldName { name: name.into() }
    }

    /// Returns a stable code for logs and diagnostics.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingHeaderDelimiter => "MISSING_HEADER_DELIMITER",
            Self::MissingContentDisposition => "MISSING_CONTENT_DISPOSITION",
            Self::InvalidContentDisposition { .. } => "INVALID_CONTENT_DISPOSITION",
            Self::InvalidFieldName { .. } => "INVALID_FIELD_NAME",
            Self::NestingTooDeep { .. } => "NESTING_TOO_DEEP",
        }
    }
}

/// Error parsing a shorthand byte size such as `2M`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ByteSizeError {
    /// The value is empty or whitespace.
    #[error("size value is empty")]
    Empty,

    /// The value is not an integer with an optional `K`/`M`/`G` suffix.
    #[error("invalid size value '{0}': expected an integer with optional K, M or G suffix")]
    Invalid(String),

    /// The value does not fit in 64 bits.
    #[error("size value '{0}' is too large")]
    Overflow(String),
}
