//! Multipart form decoding for PUT and PATCH.
//!
//! HTTP stacks usually decode `multipart/form-data` only for POST. This stage
//! buffers PUT and PATCH multipart bodies, decodes them into the
//! [`MiddlewareContext`], and puts the original bytes back on the request so
//! handlers can still read them.
//!
//! Uploaded files live in temporary files owned by the stage. They exist while
//! the rest of the chain runs and are deleted when it returns, fails, or is
//! cancelled. Handlers that want to keep a file must copy or move it before
//! returning.

use bytes::Bytes;
use eidos_multipart::{MultipartParser, ParserConfig, UploadScope};
use http::{header, Method};
use http_body_util::{BodyExt, Full};

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};

const MULTIPART_FORM_DATA: &[u8] = b"multipart/form-data";

/// Returns `true` if a request with this method and content type gets decoded.
///
/// The method must be PUT or PATCH and the content type must contain
/// `multipart/form-data` (ASCII case-insensitive).
///
/// # Example
///
/// ```
/// use eidos_middleware::stages::should_parse;
/// use http::Method;
///
/// assert!(should_parse(&Method::PUT, Some("multipart/form-data; boundary=x")));
/// assert!(should_parse(&Method::PATCH, Some("Multipart/Form-Data; boundary=x")));
/// assert!(!should_parse(&Method::POST, Some("multipart/form-data; boundary=x")));
/// assert!(!should_parse(&Method::PUT, Some("application/json")));
/// assert!(!should_parse(&Method::PUT, None));
/// ```
#[must_use]
pub fn should_parse(method: &Method, content_type: Option<&str>) -> bool {
    if method != Method::PUT && method != Method::PATCH {
        return false;
    }

    content_type.is_some_and(|value| {
        value
            .as_bytes()
            .windows(MULTIPART_FORM_DATA.len())
            .any(|window| window.eq_ignore_ascii_case(MULTIPART_FORM_DATA))
    })
}

/// Decodes PUT/PATCH `multipart/form-data` bodies into the context.
///
/// Other requests pass through untouched.
#[derive(Debug, Clone, Default)]
pub struct MultipartFormDataMiddleware {
    parser: MultipartParser,
}

impl MultipartFormDataMiddleware {
    /// Creates the stage with a parser.
    #[must_use]
    pub fn new(parser: MultipartParser) -> Self {
        Self { parser }
    }

    /// Creates the stage from a parser configuration.
    #[must_use]
    pub fn with_config(config: ParserConfig) -> Self {
        Self::new(MultipartParser::new(config))
    }

    /// Returns the parser.
    #[must_use]
    pub fn parser(&self) -> &MultipartParser {
        &self.parser
    }
}

impl Middleware for MultipartFormDataMiddleware {
    fn name(&self) -> &'static str {
        "multipart_form_data"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let content_type = request
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            if !should_parse(request.method(), content_type.as_deref()) {
                return next.run(ctx, request).await;
            }

            let (parts, body) = request.into_parts();
            let body: Bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(never) => match never {},
            };

            // removed by close() below, or on drop if this future is cancelled
            let mut uploads = UploadScope::new();
            let form = self
                .parser
                .parse(&body, content_type.as_deref(), &mut uploads);

            eidos_telemetry::log_form_decoded!(
                ctx.request_id(),
                form.fields.len(),
                form.files.len(),
                form.rejected.len()
            );
            ctx.set_form(form);

            let request = Request::from_parts(parts, Full::new(body));
            let response = next.run(ctx, request).await;

            if let Err(err) = uploads.close() {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    error = %err,
                    "failed to remove upload temp files"
                );
            }

            response
        })
    }
}
