//! Built-in middleware stages.
//!
//! | Stage | Name | Purpose |
//! |-------|------|---------|
//! | [`RequestIdMiddleware`] | `request_id` | Assign a UUID v7 request ID |
//! | [`MultipartFormDataMiddleware`] | `multipart_form_data` | Decode PUT/PATCH multipart bodies |

pub mod multipart_form;
pub mod request_id;

pub use multipart_form::{should_parse, MultipartFormDataMiddleware};
pub use request_id::{RequestIdMiddleware, REQUEST_ID_HEADER};
