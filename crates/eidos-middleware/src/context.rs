//! Per-request middleware state.

use std::time::{Duration, Instant};

use eidos_multipart::ParseResult;
use uuid::Uuid;

/// State that flows through the middleware chain for one request.
///
/// The multipart stage stores the decoded form here; handlers read it with
/// [`form`](Self::form) or take ownership with [`take_form`](Self::take_form).
///
/// # Example
///
/// ```
/// use eidos_middleware::MiddlewareContext;
/// use eidos_multipart::ParseResult;
///
/// let mut ctx = MiddlewareContext::new();
/// assert!(ctx.form().is_none());
///
/// ctx.set_form(ParseResult::default());
/// assert!(ctx.form().is_some());
/// assert!(ctx.take_form().is_some());
/// assert!(ctx.form().is_none());
/// ```
#[derive(Debug)]
pub struct MiddlewareContext {
    request_id: Uuid,
    started_at: Instant,
    form: Option<ParseResult>,
}

impl Default for MiddlewareContext {
    fn default() -> Self {
        Self::new()
    }
}

impl MiddlewareContext {
    /// Creates a context with a fresh UUID v7 request ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(Uuid::now_v7())
    }

    /// Creates a context with a specific request ID.
    #[must_use]
    pub fn with_request_id(request_id: Uuid) -> Self {
        Self {
            request_id,
            started_at: Instant::now(),
            form: None,
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Sets the request ID.
    pub fn set_request_id(&mut self, request_id: Uuid) {
        self.request_id = request_id;
    }

    /// Returns the time since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Returns the decoded multipart form, if the request carried one.
    #[must_use]
    pub fn form(&self) -> Option<&ParseResult> {
        self.form.as_ref()
    }

    /// Stores the decoded multipart form.
    pub fn set_form(&mut self, form: ParseResult) {
        self.form = Some(form);
    }

    /// Removes and returns the decoded multipart form.
    pub fn take_form(&mut self) -> Option<ParseResult> {
        self.form.take()
    }
}
