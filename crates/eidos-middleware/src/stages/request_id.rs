//! Request ID middleware.
//!
//! Assigns each request a UUID v7 (or, when trusted, the caller's
//! `X-Request-ID`) and echoes it on the response. Log lines written by later
//! stages carry the same ID.

use http::HeaderValue;
use tracing::Instrument;
use uuid::Uuid;

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};

/// The header name for request ID propagation.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware that generates or extracts request IDs.
#[derive(Debug, Clone, Default)]
pub struct RequestIdMiddleware {
    trust_incoming: bool,
}

impl RequestIdMiddleware {
    /// Creates a middleware that always generates a fresh ID.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a middleware that keeps a valid incoming `X-Request-ID`.
    #[must_use]
    pub fn trust_incoming() -> Self {
        Self {
            trust_incoming: true,
        }
    }

    fn extract_request_id(&self, request: &Request) -> Option<Uuid> {
        if !self.trust_incoming {
            return None;
        }

        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
    }
}

impl Middleware for RequestIdMiddleware {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let request_id = self
                .extract_request_id(&request)
                .unwrap_or_else(Uuid::now_v7);
            ctx.set_request_id(request_id);

            let span = tracing::debug_span!("request", request_id = %request_id);
            let mut response = next.run(ctx, request).instrument(span).await;

            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }

            response
        })
    }
}
