//! # Eidos Middleware
//!
//! Request middleware that decodes `multipart/form-data` bodies sent with PUT
//! and PATCH, which HTTP stacks typically decode only for POST.
//!
//! ```text
//! Request → RequestId → MultipartFormData → Handler
//!                             │                │
//!                  UploadScope (temp files) ───┘ deleted after the handler
//! ```
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Middleware`] / [`Next`] | Stage trait and chain continuation |
//! | [`Pipeline`] | Ordered list of stages |
//! | [`MiddlewareContext`] | Request ID, timing, decoded form |
//! | [`stages::MultipartFormDataMiddleware`] | The decoding stage |
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use eidos_middleware::stages::MultipartFormDataMiddleware;
//! use eidos_middleware::{MiddlewareContext, Pipeline, Request};
//! use http_body_util::Full;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let pipeline = Pipeline::builder()
//!     .stage(MultipartFormDataMiddleware::default())
//!     .build();
//!
//! let body = "--b\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nHello\r\n--b--\r\n";
//! let request: Request = http::Request::builder()
//!     .method("PUT")
//!     .header("content-type", "multipart/form-data; boundary=b")
//!     .body(Full::new(Bytes::from(body)))
//!     .unwrap();
//!
//! let response = pipeline
//!     .process(MiddlewareContext::new(), request, |ctx, _req| {
//!         let title = ctx.form().and_then(|f| f.field("title")).unwrap_or_default().to_string();
//!         Box::pin(async move { http::Response::new(Full::new(Bytes::from(title))) })
//!     })
//!     .await;
//! # let _ = response;
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod middleware;
pub mod pipeline;
pub mod stages;
pub mod types;

pub use context::MiddlewareContext;
pub use middleware::{BoxFuture, Handler, Middleware, Next};
pub use pipeline::{BoxedMiddleware, Pipeline, PipelineBuilder};
pub use types::{Request, Response};
