//! Bracketed field names (`user[address][city]`, `tags[]`).
//!
//! Names follow the array syntax of URL-encoded forms:
//!
//! - leading spaces are dropped, and in the base name (before the first `[`)
//!   spaces and dots become `_`
//! - each `[key]` adds a nesting level (leading whitespace in the key is
//!   skipped), `[]` appends to a list
//! - text after a `]` that does not open another `[` is ignored
//! - if the first `[` is never closed, it becomes `_` and the rest of the
//!   name is part of the base name (spaces, dots and `[` also become `_`)
//! - a later unclosed `[` ends the path at the previous segment

use std::fmt;

/// One nesting level of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `[key]`
    Key(String),
    /// `[]`, the next free integer index.
    Append,
}

/// A parsed field name: base key plus nested segments.
///
/// # Example
///
/// ```rust
/// use eidos_multipart::{FieldPath, Segment};
///
/// let path = FieldPath::parse("user[tags][]").unwrap();
/// assert_eq!(path.base(), "user");
/// assert_eq!(
///     path.segments(),
///     &[Segment::Key("tags".to_string()), Segment::Append]
/// );
/// assert_eq!(path.depth(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    base: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parses a field name.
    ///
    /// Returns `None` when the base name is empty (`""`, `"[a]"`), in which
    /// case the value has nowhere to go.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim_start_matches(' ');

        let Some(open) = name.find('[') else {
            let base = normalize(name, &[' ', '.']);
            return (!base.is_empty()).then_some(Self {
                base,
                segments: Vec::new(),
            });
        };

        let base = normalize(&name[..open], &[' ', '.']);
        if base.is_empty() {
            return None;
        }

        let mut rest = &name[open..];
        if !rest[1..].contains(']') {
            return Some(Self {
                base: format!("{base}_{}", normalize(&rest[1..], &[' ', '.', '['])),
                segments: Vec::new(),
            });
        }

        let mut segments = Vec::new();
        while let Some(inner) = rest.strip_prefix('[') {
            let Some(close) = inner.find(']') else {
                break;
            };
            let key = inner[..close].trim_start();
            segments.push(if key.is_empty() {
                Segment::Append
            } else {
                Segment::Key(key.to_string())
            });
            rest = &inner[close + 1..];
        }

        Some(Self { base, segments })
    }

    /// Returns the top-level key.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns the nested segments after the base key.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the number of nested segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        for segment in &self.segments {
            match segment {
                Segment::Key(key) => write!(f, "[{key}]")?,
                Segment::Append => f.write_str("[]")?,
            }
        }
        Ok(())
    }
}

fn normalize(input: &str, replaced: &[char]) -> String {
    input.replace(replaced, "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> Segment {
        Segment::Key(k.to_string())
    }

    #[test]
    fn test_plain_name() {
        let path = FieldPath::parse("title").unwrap();
        assert_eq!(path.base(), "title");
        assert!(path.segments().is_empty());
        assert_eq!(path.depth(), 0);
    }

    #[test]
    fn test_nested_keys() {
        let path = FieldPath::parse("profile[address][city]").unwrap();
        assert_eq!(path.base(), "profile");
        assert_eq!(path.segments(), &[key("address"), key("city")]);
    }

    #[test]
    fn test_append_segments() {
        let path = FieldPath::parse("tags[]").unwrap();
        assert_eq!(path.segments(), &[Segment::Append]);

        let path = FieldPath::parse("matrix[][]").unwrap();
        assert_eq!(path.segments(), &[Segment::Append, Segment::Append]);
    }

    #[test]
    fn test_base_name_mangling() {
        assert_eq!(FieldPath::parse("first name").unwrap().base(), "first_name");
        assert_eq!(FieldPath::parse("a.b").unwrap().base(), "a_b");
        assert_eq!(FieldPath::parse("   lead").unwrap().base(), "lead");

        // only the base is mangled
        let path = FieldPath::parse("a.b[c.d]").unwrap();
        assert_eq!(path.base(), "a_b");
        assert_eq!(path.segments(), &[key("c.d")]);
    }

    #[test]
    fn test_empty_base_is_rejected() {
        assert!(FieldPath::parse("").is_none());
        assert!(FieldPath::parse("   ").is_none());
        assert!(FieldPath::parse("[a]").is_none());
        assert!(FieldPath::parse("[unclosed").is_none());
    }

    #[test]
    fn test_unclosed_first_bracket() {
        let path = FieldPath::parse("a[b.c").unwrap();
        assert_eq!(path.base(), "a_b_c");
        assert!(path.segments().is_empty());
    }

    #[test]
    fn test_unclosed_later_bracket() {
        let path = FieldPath::parse("a[b][c").unwrap();
        assert_eq!(path.base(), "a");
        assert_eq!(path.segments(), &[key("b")]);
    }

    #[test]
    fn test_key_leading_whitespace_skipped() {
        let path = FieldPath::parse("a[ b][ ]").unwrap();
        assert_eq!(path.segments(), &[key("b"), Segment::Append]);
    }

    #[test]
    fn test_trailing_text_ignored() {
        let path = FieldPath::parse("a[b]junk[c]").unwrap();
        assert_eq!(path.segments(), &[key("b")]);
    }

    #[test]
    fn test_display_round_trip() {
        for name in ["a", "a[b]", "a[]", "a[b][][c]"] {
            assert_eq!(FieldPath::parse(name).unwrap().to_string(), name);
        }
    }
}
