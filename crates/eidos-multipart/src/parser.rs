//! Multipart body parser.
//!
//! # Example
//!
//! ```rust
//! use eidos_multipart::{MultipartParser, ParserConfig, UploadScope};
//!
//! let body = concat!(
//!     "--xyz\r\n",
//!     "Content-Disposition: form-data; name=\"user[name]\"\r\n\r\n",
//!     "Alice\r\n",
//!     "--xyz\r\n",
//!     "Content-Disposition: form-data; name=\"user[age]\"\r\n\r\n",
//!     "30\r\n",
//!     "--xyz--\r\n",
//! );
//!
//! let parser = MultipartParser::new(ParserConfig::new().upload_max_filesize(1024));
//! let mut uploads = UploadScope::new();
//! let form = parser.parse(
//!     body.as_bytes(),
//!     Some("multipart/form-data; boundary=xyz"),
//!     &mut uploads,
//! );
//!
//! let user = form.fields.get("user").unwrap();
//! assert_eq!(user.get("name").and_then(|n| n.as_leaf()).unwrap(), "Alice");
//! assert_eq!(user.get("age").and_then(|n| n.as_leaf()).unwrap(), "30");
//! ```

use std::path::PathBuf;

use crate::{
    Boundary, Disposition, FieldPath, FileMaterializer, ParseResult, ParsedPart, PartError,
    PartSplitter, RawPart, UploadScope, DEFAULT_UPLOAD_MAX_FILESIZE,
};

/// Default maximum number of bracket segments in a field name.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Configuration for [`MultipartParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum size of a single file part in bytes.
    pub upload_max_filesize: u64,
    /// Directory for temporary upload files. `None` uses the OS default.
    pub temp_dir: Option<PathBuf>,
    /// Maximum number of bracket segments in a field name.
    pub max_nesting_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            upload_max_filesize: DEFAULT_UPLOAD_MAX_FILESIZE,
            temp_dir: None,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the upload ceiling in bytes.
    #[must_use]
    pub fn upload_max_filesize(mut self, bytes: u64) -> Self {
        self.upload_max_filesize = bytes;
        self
    }

    /// Set the directory for temporary upload files.
    #[must_use]
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Set the maximum field name nesting depth.
    #[must_use]
    pub fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

/// Decodes `multipart/form-data` bodies into a [`ParseResult`].
///
/// Parsing never fails as a whole. A body without a usable boundary yields an
/// empty result, a malformed part is skipped and recorded in
/// [`ParseResult::rejected`], and file size or storage problems are reported
/// on the file's [`UploadErrorCode`](crate::UploadErrorCode).
#[derive(Debug, Clone)]
pub struct MultipartParser {
    config: ParserConfig,
    files: FileMaterializer,
}

impl Default for MultipartParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl MultipartParser {
    /// Creates a parser.
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        let files = FileMaterializer::new(config.upload_max_filesize, config.temp_dir.clone());
        Self { config, files }
    }

    /// Returns the parser configuration.
    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses `body` using the boundary declared in `content_type`.
    ///
    /// Temporary files for file parts are registered with `uploads` and live
    /// until it is dropped or closed.
    pub fn parse(
        &self,
        body: &[u8],
        content_type: Option<&str>,
        uploads: &mut UploadScope,
    ) -> ParseResult {
        let mut result = ParseResult::new();

        let Some(boundary) = Boundary::from_content_type(content_type) else {
            tracing::debug!(content_type = ?content_type, "no multipart boundary, skipping body");
            return result;
        };
        if body.is_empty() {
            tracing::debug!(%boundary, "empty multipart body");
            return result;
        }

        let splitter = match PartSplitter::new(&boundary) {
            Ok(splitter) => splitter,
            Err(err) => {
                tracing::warn!(%boundary, error = %err, "unusable multipart boundary");
                return result;
            }
        };

        let parts = splitter.split(body);
        tracing::debug!(%boundary, parts = parts.len(), bytes = body.len(), "parsing multipart body");

        for (index, raw) in parts.into_iter().enumerate() {
            if let Err(error) = self.materialize(raw, &mut result, uploads) {
                tracing::warn!(
                    part_index = index,
                    code = error.code(),
                    error = %error,
                    "rejected multipart part"
                );
                result.reject(index, error);
            }
        }

        result
    }

    fn materialize(
        &self,
        raw: RawPart<'_>,
        result: &mut ParseResult,
        uploads: &mut UploadScope,
    ) -> Result<(), PartError> {
        let part = ParsedPart::parse(raw)?;
        let disposition = part
            .headers
            .get("content-disposition")
            .ok_or(PartError::MissingContentDisposition)?;
        let Disposition {
            field_name,
            file_name,
        } = Disposition::parse(disposition)?;

        let path = FieldPath::parse(&field_name)
            .ok_or_else(|| PartError::invalid_field_name(&field_name))?;
        if path.depth() > self.config.max_nesting_depth {
            return Err(PartError::NestingTooDeep {
                depth: path.depth(),
                max: self.config.max_nesting_depth,
                name: field_name,
            });
        }

        match file_name {
            Some(file_name) => {
                let content_type = part
                    .headers
                    .get("content-type")
                    .unwrap_or_default()
                    .to_string();
                let file = self
                    .files
                    .store(file_name, content_type, part.content, uploads);
                result.files.insert(&path, file);
            }
            None => {
                let value = match std::str::from_utf8(part.content) {
                    Ok(value) => value.to_string(),
                    Err(_) => {
                        tracing::warn!(field = %field_name, "field value is not valid UTF-8");
                        String::from_utf8_lossy(part.content).into_owned()
                    }
                };
                tracing::debug!(field = %path, len = value.len(), "decoded field");
                result.fields.insert(&path, value);
            }
        }

        Ok(())
    }
}
