//! Fluent request builder and its execution pipeline.

mod body;
mod core;
mod execution;
mod query;

pub use self::core::RequestBuilder;

/// Content type for JSON request bodies.
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// Content type for XML request bodies.
pub const CONTENT_TYPE_XML: &str = "application/xml";
/// Content type that switches body serialization to the URL-encoded form
/// parameters.
pub const CONTENT_TYPE_ENCODE: &str = "application/x-www-form-urlencoded";

/// Starts building a new request.
pub fn new_request() -> RequestBuilder {
    RequestBuilder::new()
}
