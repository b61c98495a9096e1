//! Parse output.

use serde::Serialize;

use crate::{FormNode, FormTree, PartError, UploadedFile};

/// A part that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedPart {
    /// Zero-based position of the part in the body.
    pub index: usize,
    /// Why the part was rejected.
    pub error: PartError,
}

/// Fields and files decoded from one multipart body.
///
/// Serializes to `{"fields": {...}, "files": {...}}`; rejected parts are
/// diagnostics only and are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    /// Scalar fields, nested by bracketed name.
    pub fields: FormTree<String>,
    /// File uploads, nested by bracketed name.
    pub files: FormTree<UploadedFile>,
    /// Parts that contributed nothing, in body order.
    #[serde(skip)]
    pub rejected: Vec<RejectedPart>,
}

impl ParseResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no field or file was decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.files.is_empty()
    }

    /// Returns the top-level scalar field `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(FormNode::as_leaf)
            .map(String::as_str)
    }

    /// Returns the top-level file `name`.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name).and_then(FormNode::as_leaf)
    }

    /// Returns `true` if any part was rejected.
    #[must_use]
    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }

    pub(crate) fn reject(&mut self, index: usize, error: PartError) {
        self.rejected.push(RejectedPart { index, error });
    }
}
