//! # AnyReq client implementation
//!
//! A minimal configurable blocking HTTP(S) request client: a fluent builder
//! accumulates method, headers, form parameters, raw body, timeouts, charset
//! and target URL, and a single `send()` performs the whole request/response
//! cycle over a hand-rolled HTTP/1.1 transport, returning the response body
//! as text.
//!
//! `https` URLs use a deliberately permissive TLS mode that accepts any
//! server certificate and any hostname, for test/internal environments
//! where certificate validation is not desired. See [`tls`] for the risk
//! this implies.
//!
//! Out of scope by design: connection pooling/reuse, async or streaming
//! I/O, response parsing beyond raw text, retries, redirects and cookies.

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod builder;
mod charset;
mod connect;
pub mod error;
mod response;
pub mod tls;

pub use builder::{new_request, RequestBuilder, CONTENT_TYPE_ENCODE, CONTENT_TYPE_JSON, CONTENT_TYPE_XML};
pub use error::{Error, Phase, Result};
pub use tls::{trust_all_config, NoVerification};
