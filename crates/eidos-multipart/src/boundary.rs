//! Boundary extraction from the `Content-Type` header.

use std::fmt;

const BOUNDARY_PARAM: &[u8] = b"boundary=";

/// The encapsulation boundary declared by a `multipart/form-data` request.
///
/// The value is everything after the first `boundary=` in the header, taken
/// verbatim: surrounding quotes and any parameters that follow are kept and
/// must appear literally in the body.
///
/// # Example
///
/// ```rust
/// use eidos_multipart::Boundary;
///
/// let boundary = Boundary::from_content_type(Some(
///     "multipart/form-data; boundary=----WebKitFormBoundary7MA4",
/// ))
/// .unwrap();
/// assert_eq!(boundary.as_str(), "----WebKitFormBoundary7MA4");
///
/// assert!(Boundary::from_content_type(Some("multipart/form-data")).is_none());
/// assert!(Boundary::from_content_type(None).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary(String);

impl Boundary {
    /// Extracts the boundary from a `Content-Type` value.
    ///
    /// Returns `None` when the header is absent, has no `boundary=` (matched
    /// ASCII case-insensitively), or declares an empty boundary.
    #[must_use]
    pub fn from_content_type(content_type: Option<&str>) -> Option<Self> {
        let content_type = content_type?;
        let start = content_type
            .as_bytes()
            .windows(BOUNDARY_PARAM.len())
            .position(|window| window.eq_ignore_ascii_case(BOUNDARY_PARAM))?
            + BOUNDARY_PARAM.len();

        let value = &content_type[start..];
        if value.is_empty() {
            return None;
        }

        Some(Self(value.to_string()))
    }

    /// Returns the boundary token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
