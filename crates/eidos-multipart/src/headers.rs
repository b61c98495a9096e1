//! Part header parsing.
//!
//! A raw part is split at the first blank line into a header block and the
//! content. Header lines are `name: value`; lines without a colon are skipped.

use crate::{PartError, RawPart};

/// Ordered header lines of a single part.
///
/// Names are matched case-insensitively. Duplicates are kept; lookups return
/// the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartHeaders {
    entries: Vec<(String, String)>,
}

impl PartHeaders {
    /// Creates an empty header list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a header block.
    ///
    /// Lines are separated by `\n` (a trailing `\r` is dropped). The name is
    /// everything before the first colon, trimmed; the value is the rest with
    /// leading spaces removed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use eidos_multipart::PartHeaders;
    ///
    /// let headers = PartHeaders::parse(
    ///     b"Content-Disposition: form-data; name=\"a\"\r\nX-Stray-Line\r\nContent-Type: text/plain",
    /// );
    /// assert_eq!(headers.len(), 2);
    /// assert_eq!(headers.get("content-type"), Some("text/plain"));
    /// ```
    #[must_use]
    pub fn parse(block: &[u8]) -> Self {
        let entries = block
            .split(|&b| b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .filter_map(|line| {
                let line = String::from_utf8_lossy(line);
                let (name, value) = line.split_once(':')?;
                Some((
                    name.trim().to_string(),
                    value.trim_start_matches(' ').to_string(),
                ))
            })
            .collect();

        Self { entries }
    }

    /// Returns the first value for `name`, compared case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of parsed header lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no header lines were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A part split into headers and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPart<'a> {
    /// Header lines.
    pub headers: PartHeaders,
    /// Content bytes, untouched.
    pub content: &'a [u8],
}

impl<'a> ParsedPart<'a> {
    /// Splits a raw part into headers and content.
    ///
    /// One leading line break (left over from the boundary line) is skipped
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::MissingHeaderDelimiter`] if the part has no blank
    /// line (`\r\n\r\n` or `\n\n`).
    pub fn parse(raw: RawPart<'a>) -> Result<Self, PartError> {
        let bytes = strip_line_break(raw.as_bytes());
        let (block, content) =
            split_at_blank_line(bytes).ok_or(PartError::MissingHeaderDelimiter)?;

        Ok(Self {
            headers: PartHeaders::parse(block),
            content,
        })
    }
}

fn strip_line_break(bytes: &[u8]) -> &[u8] {
    bytes
        .strip_prefix(b"\r\n")
        .or_else(|| bytes.strip_prefix(b"\n"))
        .or_else(|| bytes.strip_prefix(b"\r"))
        .unwrap_or(bytes)
}

fn split_at_blank_line(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let crlf = find(bytes, b"\r\n\r\n").map(|i| (i, 4));
    let lf = find(bytes, b"\n\n").map(|i| (i, 2));

    let (at, len) = match (crlf, lf) {
        (Some(a), Some(b)) => {
            if a.0 <= b.0 {
                a
            } else {
                b
            }
        }
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };

    Some((&bytes[..at], &bytes[at + len..]))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
