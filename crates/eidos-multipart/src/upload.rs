//! Uploaded files and their request-scoped temporary storage.
//!
//! File parts are written to uniquely named temporary files. Every file is
//! owned by an [`UploadScope`]; dropping the scope deletes them all, so a
//! request that ends early, errors, or is cancelled leaves nothing behind.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use tempfile::TempPath;

/// Prefix of every temporary upload file.
pub const TEMP_FILE_PREFIX: &str = "MultipartFormData_";

/// Outcome of storing a file part.
///
/// Serializes as the numeric code native form decoders use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadErrorCode {
    /// Stored successfully.
    Ok,
    /// Larger than the upload ceiling; nothing was written.
    SizeExceeded,
    /// The temporary file could not be created or written.
    StorageFailure,
}

impl UploadErrorCode {
    /// Returns the native numeric code (0, 1 or 7).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::SizeExceeded => 1,
            Self::StorageFailure => 7,
        }
    }

    /// Returns `true` for [`UploadErrorCode::Ok`].
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl Serialize for UploadErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Descriptor of a file part.
///
/// Serializes to `{name, type, tmp_name, error, size}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    /// File name sent by the client (may be empty).
    #[serde(rename = "name")]
    pub original_name: String,
    /// Content type declared by the part, or empty.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Temporary file holding the content, when stored.
    #[serde(rename = "tmp_name")]
    pub storage_path: Option<PathBuf>,
    /// Storage outcome.
    pub error: UploadErrorCode,
    /// Content length in bytes.
    pub size: u64,
}

impl UploadedFile {
    /// Returns the temporary file path, if the content was stored.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.storage_path.as_deref()
    }

    /// Returns `true` if the content was stored.
    #[must_use]
    pub fn is_stored(&self) -> bool {
        self.error.is_ok() && self.storage_path.is_some()
    }

    /// Returns the extension of the original file name.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.original_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }
}

/// Owner of the temporary files created while parsing one request.
///
/// Create one per request, pass it to
/// [`MultipartParser::parse`](crate::MultipartParser::parse), and keep it
/// alive while the handler reads the files. Files are deleted when the scope
/// is dropped or [closed](Self::close), whether or not they were read, moved,
/// or copied.
///
/// # Example
///
/// ```rust
/// use eidos_multipart::{MultipartParser, UploadScope};
///
/// let body = b"--b\r\nContent-Disposition: form-data; name=\"f\"; filename=\"a.txt\"\r\n\r\nhi\r\n--b--";
/// let parser = MultipartParser::default();
///
/// let path = {
///     let mut uploads = UploadScope::new();
///     let form = parser.parse(body, Some("multipart/form-data; boundary=b"), &mut uploads);
///     let file = form.files.get("f").and_then(|n| n.as_leaf()).unwrap();
///     let path = file.path().unwrap().to_path_buf();
///     assert_eq!(std::fs::read(&path).unwrap(), b"hi");
///     path
/// };
/// assert!(!path.exists());
/// ```
#[derive(Debug, Default)]
pub struct UploadScope {
    files: Vec<TempPath>,
}

impl UploadScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of files owned by the scope.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the scope owns no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterates over the owned file paths.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|path| &**path)
    }

    /// Deletes every owned file now.
    ///
    /// Files that no longer exist (moved by the caller) are not an error.
    ///
    /// # Errors
    ///
    /// Returns the first deletion error; the remaining files are still
    /// deleted.
    pub fn close(mut self) -> io::Result<()> {
        let mut first_error = None;
        for path in std::mem::take(&mut self.files) {
            if let Err(err) = path.close() {
                if err.kind() != io::ErrorKind::NotFound && first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn register(&mut self, path: TempPath) -> PathBuf {
        let owned = path.to_path_buf();
        self.files.push(path);
        owned
    }
}

impl Drop for UploadScope {
    fn drop(&mut self) {
        if !self.files.is_empty() {
            tracing::debug!(count = self.files.len(), "releasing upload temp files");
        }
    }
}

/// Stores file parts under an upload ceiling.
#[derive(Debug, Clone)]
pub struct FileMaterializer {
    max_file_size: u64,
    temp_dir: Option<PathBuf>,
}

impl FileMaterializer {
    /// Creates a materializer. `temp_dir` defaults to the OS temp directory.
    #[must_use]
    pub fn new(max_file_size: u64, temp_dir: Option<PathBuf>) -> Self {
        Self {
            max_file_size,
            temp_dir,
        }
    }

    /// Returns the upload ceiling in bytes.
    #[must_use]
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Stores `content` and describes the result.
    ///
    /// Content over the ceiling is not written. On success the temporary file
    /// is registered with `uploads`.
    pub fn store(
        &self,
        original_name: String,
        content_type: String,
        content: &[u8],
        uploads: &mut UploadScope,
    ) -> UploadedFile {
        let size = u64::try_from(content.len()).unwrap_or(u64::MAX);
        let mut file = UploadedFile {
            original_name,
            content_type,
            storage_path: None,
            error: UploadErrorCode::Ok,
            size,
        };

        if size > self.max_file_size {
            tracing::warn!(
                file_name = %file.original_name,
                size,
                limit = self.max_file_size,
                "upload exceeds size ceiling"
            );
            file.error = UploadErrorCode::SizeExceeded;
            return file;
        }

        match self.write_temp(content) {
            Ok(path) => {
                let stored = uploads.register(path);
                tracing::debug!(
                    file_name = %file.original_name,
                    size,
                    path = %stored.display(),
                    "stored upload"
                );
                file.storage_path = Some(stored);
            }
            Err(err) => {
                tracing::warn!(
                    file_name = %file.original_name,
                    error = %err,
                    "failed to store upload"
                );
                file.error = UploadErrorCode::StorageFailure;
            }
        }

        file
    }

    // A failed write drops the NamedTempFile, which removes it.
    fn write_temp(&self, content: &[u8]) -> io::Result<TempPath> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_FILE_PREFIX);

        let mut temp = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        temp.write_all(content)?;
        temp.flush()?;

        Ok(temp.into_temp_path())
    }
}
