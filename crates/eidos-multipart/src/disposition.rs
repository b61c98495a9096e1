//! `Content-Disposition` parsing.
//!
//! Accepted grammar, anchored at the start of the value and case-sensitive:
//!
//! ```text
//! form-data; *name="<one or more non-quote chars>"(; *filename="<non-quote chars>")?
//! ```
//!
//! Anything after the last matched token is ignored.

use crate::PartError;

/// Field name and optional file name of a part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disposition {
    /// Form field name, possibly bracketed (`user[name]`). Never empty.
    pub field_name: String,
    /// Original file name. `Some("")` for an unselected file input.
    pub file_name: Option<String>,
}

impl Disposition {
    /// Parses a `Content-Disposition` header value.
    ///
    /// Leading spaces are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidContentDisposition`] when the value does not
    /// match the grammar, including a missing or empty `name`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use eidos_multipart::Disposition;
    ///
    /// let d = Disposition::parse(r#"form-data; name="avatar"; filename="me.png""#).unwrap();
    /// assert_eq!(d.field_name, "avatar");
    /// assert_eq!(d.file_name.as_deref(), Some("me.png"));
    /// assert!(d.is_file());
    ///
    /// let d = Disposition::parse(r#"form-data; name="title""#).unwrap();
    /// assert!(!d.is_file());
    /// ```
    pub fn parse(value: &str) -> Result<Self, PartError> {
        let mut cursor = Cursor::new(value.trim_start_matches(' '));

        if !cursor.eat("form-data;") {
            return Err(PartError::invalid_disposition(value));
        }
        cursor.skip_spaces();
        if !cursor.eat("name=") {
            return Err(PartError::invalid_disposition(value));
        }
        let field_name = cursor
            .quoted()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| PartError::invalid_disposition(value))?;

        Ok(Self {
            field_name: field_name.to_string(),
            file_name: cursor.file_name().map(str::to_string),
        })
    }

    /// Returns `true` if the part is a file upload.
    ///
    /// Presence of `filename=` decides, not its value.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.file_name.is_some()
    }
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn eat(&mut self, literal: &str) -> bool {
        match self.rest.strip_prefix(literal) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn skip_spaces(&mut self) {
        self.rest = self.rest.trim_start_matches(' ');
    }

    fn quoted(&mut self) -> Option<&'a str> {
        let inner = self.rest.strip_prefix('"')?;
        let end = inner.find('"')?;
        self.rest = &inner[end + 1..];
        Some(&inner[..end])
    }

    // `; *filename="..."`, all or nothing.
    fn file_name(&mut self) -> Option<&'a str> {
        let saved = self.rest;
        let parsed = self.file_name_param();
        if parsed.is_none() {
            self.rest = saved;
        }
        parsed
    }

    fn file_name_param(&mut self) -> Option<&'a str> {
        if !self.eat(";") {
            return None;
        }
        self.skip_spaces();
        if !self.eat("filename=") {
            return None;
        }
        self.quoted()
    }
}
