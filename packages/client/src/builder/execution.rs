//! The `send()` pipeline: resolve, open, secure, write, read, decode.
//!
//! Strictly sequential, single attempt, no retries. The connection is owned
//! by this function and dropped on every exit path.

use std::io::Write;

use url::Url;

use crate::error::{Error, Phase, Result};
use crate::{charset, connect, response};

use super::core::RequestBuilder;
use super::{body, query};

pub(crate) fn send(builder: RequestBuilder) -> Result<String> {
    let encoding = charset::for_label(&builder.charset)?;

    let path = builder.path.as_deref().unwrap_or("");
    let url = query::resolve(path, builder.is_get(), &builder.form_params, encoding)?;
    tracing::debug!(method = %builder.method, url = %url, "sending request");

    let mut stream = connect::open(&url, builder.connect_timeout, builder.read_timeout)?;

    // GET never writes a body, regardless of configuration.
    let body_bytes = if builder.is_get() {
        None
    } else {
        body::resolve(&builder, encoding)?
    };
    write_request(&mut stream, &builder, &url, body_bytes.as_deref())?;

    let head = builder.method.eq_ignore_ascii_case(RequestBuilder::HEAD);
    let response = response::read(&mut stream, builder.read_timeout, !head)?;
    if response.status.is_success() {
        tracing::debug!(status = %response.status, bytes = response.body.len(), "response received");
    } else {
        tracing::warn!(status = %response.status, "non-success response, returning its payload");
    }

    Ok(charset::decode(encoding, &response.body))
}

fn write_request(
    stream: &mut connect::Stream,
    builder: &RequestBuilder,
    url: &Url,
    body: Option<&[u8]>,
) -> Result<()> {
    let mut head = String::new();
    head.push_str(&builder.method);
    head.push(' ');
    head.push_str(&query::request_target(url));
    head.push_str(" HTTP/1.1\r\n");

    if !has_header(builder, "host") {
        head.push_str("Host: ");
        head.push_str(url.host_str().unwrap_or_default());
        if let Some(port) = url.port() {
            head.push(':');
            head.push_str(&port.to_string());
        }
        head.push_str("\r\n");
    }

    for (name, value) in &builder.headers {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }

    // Non-GET requests advertise their length even when nothing is written.
    if !builder.is_get() && !has_header(builder, "content-length") {
        head.push_str(&format!(
            "Content-Length: {}\r\n",
            body.map_or(0, <[u8]>::len)
        ));
    }
    if !has_header(builder, "accept-encoding") {
        head.push_str("Accept-Encoding: identity\r\n");
    }
    if !has_header(builder, "connection") {
        head.push_str("Connection: close\r\n");
    }
    head.push_str("\r\n");

    stream
        .write_all(head.as_bytes())
        .map_err(|e| Error::from_io(Phase::Write, builder.read_timeout, e))?;
    if let Some(body) = body {
        stream
            .write_all(body)
            .map_err(|e| Error::from_io(Phase::Write, builder.read_timeout, e))?;
    }
    stream
        .flush()
        .map_err(|e| Error::from_io(Phase::Write, builder.read_timeout, e))?;
    Ok(())
}

fn has_header(builder: &RequestBuilder, name: &str) -> bool {
    builder
        .headers
        .iter()
        .any(|(key, _)| key.eq_ignore_ascii_case(name))
}
