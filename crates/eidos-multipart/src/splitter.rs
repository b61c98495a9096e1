//! Splitting a multipart body into raw parts.

use regex::bytes::Regex;

use crate::Boundary;

/// An unparsed part: the bytes between two boundary delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPart<'a>(&'a [u8]);

impl<'a> RawPart<'a> {
    /// Wraps a byte span.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }

    /// Returns the part bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// Returns the part length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the part holds no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Splits a body on `<line break>?-+<boundary>` delimiters.
///
/// The optional line break is `\r\n`, `\n` or `\r` and belongs to the
/// delimiter, so part content never carries the line break that precedes the
/// next boundary. The boundary itself is matched literally.
///
/// # Example
///
/// ```rust
/// use eidos_multipart::{Boundary, PartSplitter};
///
/// let boundary = Boundary::from_content_type(Some("multipart/form-data; boundary=xx")).unwrap();
/// let splitter = PartSplitter::new(&boundary).unwrap();
///
/// let body = b"--xx\r\nA: 1\r\n\r\none\r\n--xx\r\nA: 2\r\n\r\ntwo\r\n--xx--\r\n";
/// let parts = splitter.split(body);
/// assert_eq!(parts.len(), 2);
/// assert_eq!(parts[0].as_bytes(), b"\r\nA: 1\r\n\r\none");
/// ```
#[derive(Debug, Clone)]
pub struct PartSplitter {
    delimiter: Regex,
}

impl PartSplitter {
    /// Builds a splitter for the given boundary.
    ///
    /// # Errors
    ///
    /// Returns the regex error if the delimiter pattern cannot be compiled,
    /// which only happens for pathologically long boundaries.
    pub fn new(boundary: &Boundary) -> Result<Self, regex::Error> {
        let pattern = format!(r"(?:\r\n|\n|\r)?-+{}", regex::escape(boundary.as_str()));
        Ok(Self {
            delimiter: Regex::new(&pattern)?,
        })
    }

    /// Splits `body` into its non-empty parts, in body order.
    ///
    /// The segment after the last delimiter (the closing `--` and any
    /// epilogue) is always dropped. A body without delimiters yields no parts.
    #[must_use]
    pub fn split<'a>(&self, body: &'a [u8]) -> Vec<RawPart<'a>> {
        let mut segments: Vec<&'a [u8]> = self.delimiter.split(body).collect();
        segments.pop();

        segments
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .map(RawPart::new)
            .collect()
    }
}
