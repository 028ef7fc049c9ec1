//! HTTP/1.1 response reading.
//!
//! Reads the status line, the header block and the body. The body is read to
//! completion according to its framing (`Content-Length`, chunked transfer
//! coding, or to EOF under `Connection: close`) and returned as raw bytes
//! regardless of the status code, so error payloads on non-2xx responses are
//! preserved for the caller.

use std::io::{BufRead, BufReader, Read};
use std::time::Duration;

use http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

use crate::error::{Error, Phase, Result};

#[derive(Debug)]
pub(crate) struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Vec<u8>,
}

/// Reads a complete response from `stream`.
///
/// `expect_body` is false for HEAD requests, whose responses carry framing
/// headers but no body.
pub(crate) fn read<R: Read>(stream: R, read_timeout: Duration, expect_body: bool) -> Result<Response> {
    let mut reader = BufReader::new(stream);

    let status = parse_status_line(&read_line(&mut reader, read_timeout)?)?;
    let headers = read_headers(&mut reader, read_timeout)?;

    let body = if !expect_body || status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED
    {
        Vec::new()
    } else {
        read_body(&mut reader, &headers, read_timeout)?
    };

    Ok(Response {
        status,
        headers,
        body,
    })
}

fn read_line<R: BufRead>(reader: &mut R, read_timeout: Duration) -> Result<String> {
    let mut line = Vec::new();
    let n = reader
        .read_until(b'\n', &mut line)
        .map_err(|e| Error::from_io(Phase::Read, read_timeout, e))?;
    if n == 0 {
        return Err(Error::Protocol("unexpected end of response".into()));
    }
    while matches!(line.last(), Some(b'\n') | Some(b'\r')) {
        line.pop();
    }
    String::from_utf8(line).map_err(|_| Error::Protocol("non-utf8 response head".into()))
}

fn parse_status_line(line: &str) -> Result<StatusCode> {
    let mut parts = line.split_whitespace();
    let version = parts.next().unwrap_or("");
    if !version.starts_with("HTTP/") {
        return Err(Error::Protocol(format!("bad status line: {line:?}")));
    }
    let code = parts
        .next()
        .and_then(|c| c.parse::<u16>().ok())
        .ok_or_else(|| Error::Protocol(format!("bad status line: {line:?}")))?;
    StatusCode::from_u16(code).map_err(|_| Error::Protocol(format!("bad status code: {code}")))
}

fn read_headers<R: BufRead>(reader: &mut R, read_timeout: Duration) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    loop {
        let line = read_line(reader, read_timeout)?;
        if line.is_empty() {
            return Ok(headers);
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::Protocol(format!("bad header line: {line:?}")))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| Error::Protocol(format!("bad header name: {name:?}")))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|_| Error::Protocol(format!("bad header value for {name}")))?;
        headers.append(name, value);
    }
}

fn read_body<R: BufRead>(
    reader: &mut R,
    headers: &HeaderMap,
    read_timeout: Duration,
) -> Result<Vec<u8>> {
    if is_chunked(headers) {
        return read_chunked(reader, read_timeout);
    }

    if let Some(length) = content_length(headers)? {
        let mut body = vec![0u8; length];
        reader
            .read_exact(&mut body)
            .map_err(|e| Error::from_io(Phase::Read, read_timeout, e))?;
        return Ok(body);
    }

    // Connection: close framing, read until the server hangs up.
    let mut body = Vec::new();
    reader
        .read_to_end(&mut body)
        .map_err(|e| Error::from_io(Phase::Read, read_timeout, e))?;
    Ok(body)
}

fn is_chunked(headers: &HeaderMap) -> bool {
    headers
        .get_all(TRANSFER_ENCODING)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.to_ascii_lowercase().contains("chunked"))
}

fn content_length(headers: &HeaderMap) -> Result<Option<usize>> {
    match headers.get(CONTENT_LENGTH) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .map(Some)
            .ok_or_else(|| Error::Protocol("bad content-length".into())),
    }
}

fn read_chunked<R: BufRead>(reader: &mut R, read_timeout: Duration) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    loop {
        let line = read_line(reader, read_timeout)?;
        let size_token = line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_token, 16)
            .map_err(|_| Error::Protocol(format!("bad chunk size: {size_token:?}")))?;
        if size == 0 {
            // Trailer section, up to and including the blank line.
            loop {
                if read_line(reader, read_timeout)?.is_empty() {
                    return Ok(body);
                }
            }
        }
        let start = body.len();
        body.resize(start + size, 0);
        reader
            .read_exact(&mut body[start..])
            .map_err(|e| Error::from_io(Phase::Read, read_timeout, e))?;
        let mut crlf = [0u8; 2];
        reader
            .read_exact(&mut crlf)
            .map_err(|e| Error::from_io(Phase::Read, read_timeout, e))?;
    }
}
