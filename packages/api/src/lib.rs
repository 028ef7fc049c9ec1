//! # AnyReq public API
//!
//! Minimal blocking HTTP(S) request client with a fluent builder and a
//! trust-all TLS mode for test/internal environments.
//!
//! ```no_run
//! use anyreq::{new_request, RequestBuilder, CONTENT_TYPE_ENCODE};
//!
//! let text = new_request()
//!     .url("http://example.test/api")
//!     .method(RequestBuilder::POST)
//!     .headers("Content-Type", CONTENT_TYPE_ENCODE)
//!     .param("q", "hello world")
//!     .send()?;
//! # Ok::<(), anyreq::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

// Re-export the public surface of the client implementation.
pub use anyreq_client::{
    new_request, trust_all_config, Error, NoVerification, Phase, RequestBuilder, Result,
    CONTENT_TYPE_ENCODE, CONTENT_TYPE_JSON, CONTENT_TYPE_XML,
};

/// Entry point with per-method shorthands.
pub struct AnyReq;

impl AnyReq {
    /// Start a GET request for `path`.
    pub fn get(path: impl Into<String>) -> RequestBuilder {
        new_request().url(path)
    }

    /// Start a POST request for `path`.
    pub fn post(path: impl Into<String>) -> RequestBuilder {
        new_request().method(RequestBuilder::POST).url(path)
    }

    /// Start a PUT request for `path`.
    pub fn put(path: impl Into<String>) -> RequestBuilder {
        new_request().method(RequestBuilder::PUT).url(path)
    }

    /// Start a DELETE request for `path`.
    pub fn delete(path: impl Into<String>) -> RequestBuilder {
        new_request().method(RequestBuilder::DELETE).url(path)
    }

    /// Start a PATCH request for `path`.
    pub fn patch(path: impl Into<String>) -> RequestBuilder {
        new_request().method(RequestBuilder::PATCH).url(path)
    }

    /// Start a HEAD request for `path`.
    pub fn head(path: impl Into<String>) -> RequestBuilder {
        new_request().method(RequestBuilder::HEAD).url(path)
    }
}
