//! HTTP request and response types used by the middleware chain.

use bytes::Bytes;
use http_body_util::Full;

/// The HTTP request type used in the middleware chain.
///
/// Bodies are fully buffered, which is what multipart decoding needs anyway.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type used in the middleware chain.
pub type Response = http::Response<Full<Bytes>>;
