//! # Eidos Multipart
//!
//! `multipart/form-data` decoding for request bodies that the HTTP layer does
//! not decode itself (PUT and PATCH).
//!
//! The parser turns a raw body plus its `Content-Type` header into nested form
//! fields and uploaded-file descriptors, in the same shape native form
//! decoders produce for POST requests.
//!
//! ## Pipeline
//!
//! | Stage | Type | Description |
//! |-------|------|-------------|
//! | Boundary | [`Boundary`] | Boundary token from `Content-Type` |
//! | Split | [`PartSplitter`] | Body to ordered [`RawPart`]s |
//! | Headers | [`ParsedPart`] | Part to [`PartHeaders`] plus content |
//! | Disposition | [`Disposition`] | Field name and optional file name |
//! | Fields | [`FieldPath`], [`FormTree`] | Bracketed names merged into nested maps |
//! | Files | [`FileMaterializer`] | Content stored in scoped temp files |
//!
//! [`MultipartParser`] runs the stages and returns a [`ParseResult`].
//!
//! ## Example
//!
//! ```rust
//! use eidos_multipart::{MultipartParser, UploadErrorCode, UploadScope};
//!
//! let body = concat!(
//!     "--XyZ\r\n",
//!     "Content-Disposition: form-data; name=\"tags[]\"\r\n\r\n",
//!     "rust\r\n",
//!     "--XyZ\r\n",
//!     "Content-Disposition: form-data; name=\"tags[]\"\r\n\r\n",
//!     "http\r\n",
//!     "--XyZ\r\n",
//!     "Content-Disposition: form-data; name=\"doc\"; filename=\"notes.txt\"\r\n",
//!     "Content-Type: text/plain\r\n\r\n",
//!     "hello\r\n",
//!     "--XyZ--\r\n",
//! );
//!
//! let parser = MultipartParser::default();
//! let mut uploads = UploadScope::new();
//! let form = parser.parse(body.as_bytes(), Some("multipart/form-data; boundary=XyZ"), &mut uploads);
//!
//! let tags = form.fields.get("tags").unwrap().values();
//! assert_eq!(tags, vec!["rust", "http"]);
//!
//! let doc = form.file("doc").unwrap();
//! assert_eq!(doc.error, UploadErrorCode::Ok);
//! assert_eq!(std::fs::read(doc.path().unwrap()).unwrap(), b"hello");
//! ```
//!
//! ## Error Handling
//!
//! [`MultipartParser::parse`] never fails. Malformed parts are skipped and
//! listed in [`ParseResult::rejected`] with a [`PartError`]; oversized or
//! unwritable files carry an [`UploadErrorCode`].
//!
//! ## Temporary Files
//!
//! Stored files belong to the [`UploadScope`] passed to `parse` and are
//! deleted when it is dropped, on every exit path.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod boundary;
mod disposition;
mod error;
mod field_path;
mod headers;
mod parser;
mod result;
mod size;
mod splitter;
mod tree;
mod upload;

pub use boundary::Boundary;
pub use disposition::Disposition;
pub use error::{ByteSizeError, PartError};
pub use field_path::{FieldPath, Segment};
pub use headers::{ParsedPart, PartHeaders};
pub use parser::{MultipartParser, ParserConfig, DEFAULT_MAX_NESTING_DEPTH};
pub use result::{ParseResult, RejectedPart};
pub use size::{parse_byte_size, DEFAULT_UPLOAD_MAX_FILESIZE};
pub use splitter::{PartSplitter, RawPart};
pub use tree::{FormNode, FormTree};
pub use upload::{FileMaterializer, UploadErrorCode, UploadScope, UploadedFile, TEMP_FILE_PREFIX};
