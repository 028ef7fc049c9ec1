//! The request accumulator and its fluent setters.
//!
//! Setters perform no validation and no I/O; everything is checked when
//! [`RequestBuilder::send`] consumes the builder. Each execution opens and
//! fully disposes its own connection, and `send` takes the builder by value
//! so a consumed request cannot be reused.

use std::time::Duration;

use crate::error::Result;

use super::execution;

/// Accumulates the configuration for a single blocking HTTP(S) request.
///
/// ```no_run
/// use anyreq_client::builder::{new_request, CONTENT_TYPE_ENCODE, RequestBuilder};
///
/// let text = new_request()
///     .url("http://example.test/api")
///     .method(RequestBuilder::POST)
///     .headers("Content-Type", CONTENT_TYPE_ENCODE)
///     .param("q", "hello world")
///     .send()?;
/// # Ok::<(), anyreq_client::Error>(())
/// ```
#[derive(Debug, Clone)]
#[must_use = "builders do nothing unless you call send()"]
pub struct RequestBuilder {
    pub(crate) method: String,
    pub(crate) path: Option<String>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) form_params: Vec<(String, String)>,
    pub(crate) content: Option<String>,
    pub(crate) charset: String,
    pub(crate) connect_timeout: Duration,
    pub(crate) read_timeout: Duration,
}

impl RequestBuilder {
    pub const GET: &'static str = "GET";
    pub const POST: &'static str = "POST";
    pub const PUT: &'static str = "PUT";
    pub const DELETE: &'static str = "DELETE";
    pub const PATCH: &'static str = "PATCH";
    pub const OPTIONS: &'static str = "OPTIONS";
    pub const HEAD: &'static str = "HEAD";
    pub const TRACE: &'static str = "TRACE";

    /// Connection establishment bound when none is configured.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(3000);
    /// Read bound when none is configured.
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(30_000);
    /// Charset for body serialization and response decoding when none is
    /// configured.
    pub const DEFAULT_CHARSET: &'static str = "UTF-8";

    /// Starts a new request with method GET and the default charset and
    /// timeouts.
    pub fn new() -> Self {
        Self {
            method: Self::GET.to_string(),
            path: None,
            headers: Vec::new(),
            form_params: Vec::new(),
            content: None,
            charset: Self::DEFAULT_CHARSET.to_string(),
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
        }
    }

    /// Sets a header, overwriting any previous value for the same name
    /// (case-insensitive). A `Content-Type` header, if present, drives body
    /// serialization.
    ///
    /// Headers are written to the wire in insertion order, but no ordering
    /// guarantee is part of the contract beyond last-write-wins per name.
    pub fn headers(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(&key))
        {
            Some(entry) => entry.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Adds a form parameter when both key and value are present; a missing
    /// key or value makes this a no-op. Insertion order is preserved; a
    /// repeated key overwrites the value in place.
    ///
    /// Form parameters become the URL query for GET requests and the
    /// URL-encoded body for other methods when the content type asks for it.
    pub fn param<'a>(
        mut self,
        key: impl Into<Option<&'a str>>,
        value: impl Into<Option<&'a str>>,
    ) -> Self {
        if let (Some(key), Some(value)) = (key.into(), value.into()) {
            match self.form_params.iter_mut().find(|(k, _)| k == key) {
                Some(entry) => entry.1 = value.to_string(),
                None => self.form_params.push((key.to_string(), value.to_string())),
            }
        }
        self
    }

    /// Sets the HTTP method token. Stored as given; comparisons against GET
    /// and HEAD elsewhere are case-insensitive.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Sets the charset label used for body serialization and response
    /// decoding. Resolved at send time; an unknown label fails the request.
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Bounds connection establishment, in milliseconds.
    pub fn connect_timeout(mut self, ms: u64) -> Self {
        self.connect_timeout = Duration::from_millis(ms);
        self
    }

    /// Bounds each read operation, in milliseconds.
    pub fn read_timeout(mut self, ms: u64) -> Self {
        self.read_timeout = Duration::from_millis(ms);
        self
    }

    /// Sets a pre-serialized request body, used when the content type does
    /// not select the URL-encoded form parameters.
    pub fn request_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the target URL. Must start with `http` and parse as an
    /// `http`/`https` URL, checked at send time.
    pub fn url(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Executes the request and returns the response body as text.
    ///
    /// Performs the whole cycle: URL resolution, connection, optional TLS
    /// with trust-all verification, body write, response read and decode.
    /// Non-2xx statuses are not errors; the server's error payload is
    /// returned as the text. The connection is released before this returns,
    /// whether it succeeds or fails.
    pub fn send(self) -> Result<String> {
        execution::send(self)
    }

    pub(crate) fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case(Self::GET)
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
