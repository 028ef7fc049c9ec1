//! End-to-end tests for `send()` against fake servers on loopback.
//!
//! Each test spins a one-shot `TcpListener` server on its own thread,
//! captures the exact request bytes, replies with a canned response, and
//! then reads until EOF to observe the client releasing the connection.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyreq_client::{new_request, Error, Phase, RequestBuilder, CONTENT_TYPE_ENCODE, CONTENT_TYPE_JSON};

struct Exchange {
    /// Raw request bytes as the server saw them.
    request: String,
    /// Whether the client closed the connection after the response.
    client_closed: bool,
}

/// Serves exactly one connection, replying with `response` after the full
/// request has been read.
fn serve_once(response: Vec<u8>) -> (String, JoinHandle<Exchange>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        stream.write_all(&response).unwrap();
        stream.flush().unwrap();
        let mut sink = [0u8; 256];
        let client_closed = loop {
            match stream.read(&mut sink) {
                Ok(0) => break true,
                Ok(_) => continue,
                Err(_) => break false,
            }
        };
        Exchange {
            request,
            client_closed,
        }
    });
    (format!("http://{addr}"), handle)
}

/// Reads one full HTTP request (head plus `Content-Length` body).
fn read_request(stream: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];
    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
    }
    let text = String::from_utf8_lossy(&raw).to_string();
    let head_end = text.find("\r\n\r\n").map_or(text.len(), |i| i + 4);
    let content_length = text[..head_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    while raw.len() - head_end < content_length {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&raw).to_string()
}

fn ok_response(body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    )
    .into_bytes()
}

#[test]
fn get_merges_params_into_the_query_and_returns_the_body() {
    let (base, server) = serve_once(ok_response("pong"));

    let text = new_request()
        .url(format!("{base}/path"))
        .param("a", "1")
        .param("b", "x y")
        .send()
        .unwrap();

    assert_eq!(text, "pong");
    let exchange = server.join().unwrap();
    assert!(
        exchange.request.starts_with("GET /path?a=1&b=x%20y HTTP/1.1\r\n"),
        "request was: {}",
        exchange.request
    );
    // GET never writes a body.
    assert!(exchange.request.ends_with("\r\n\r\n"));
}

#[test]
fn get_appends_to_an_existing_query_with_an_ampersand() {
    let (base, server) = serve_once(ok_response("ok"));

    new_request()
        .url(format!("{base}/path?existing=1"))
        .param("a", "2")
        .send()
        .unwrap();

    let exchange = server.join().unwrap();
    assert!(exchange
        .request
        .starts_with("GET /path?existing=1&a=2 HTTP/1.1\r\n"));
}

#[test]
fn get_without_params_keeps_the_dangling_separator() {
    let (base, server) = serve_once(ok_response("ok"));

    new_request().url(format!("{base}/path")).send().unwrap();

    let exchange = server.join().unwrap();
    assert!(exchange.request.starts_with("GET /path? HTTP/1.1\r\n"));
}

#[test]
fn post_form_params_travel_in_the_body_not_the_url() {
    let (base, server) = serve_once(ok_response("created"));

    let text = new_request()
        .url(format!("{base}/api"))
        .method(RequestBuilder::POST)
        .headers("Content-Type", CONTENT_TYPE_ENCODE)
        .param("q", "hello world")
        .send()
        .unwrap();

    assert_eq!(text, "created");
    let exchange = server.join().unwrap();
    assert!(exchange.request.starts_with("POST /api HTTP/1.1\r\n"));
    assert!(exchange.request.contains("Content-Length: 15\r\n"));
    assert!(exchange.request.ends_with("\r\n\r\nq=hello%20world"));
}

#[test]
fn post_raw_content_is_written_verbatim() {
    let (base, server) = serve_once(ok_response("ok"));

    new_request()
        .url(format!("{base}/api"))
        .method(RequestBuilder::POST)
        .headers("Content-Type", CONTENT_TYPE_JSON)
        .param("ignored", "param")
        .request_content("{\"x\":1}")
        .send()
        .unwrap();

    let exchange = server.join().unwrap();
    assert!(exchange.request.starts_with("POST /api HTTP/1.1\r\n"));
    assert!(exchange.request.ends_with("\r\n\r\n{\"x\":1}"));
    // Without the form content type the params must not leak into the URL.
    assert!(!exchange.request.contains("ignored"));
}

#[test]
fn post_without_body_advertises_zero_length() {
    let (base, server) = serve_once(ok_response("ok"));

    new_request()
        .url(format!("{base}/api"))
        .method(RequestBuilder::POST)
        .send()
        .unwrap();

    let exchange = server.join().unwrap();
    assert!(exchange.request.contains("Content-Length: 0\r\n"));
}

#[test]
fn default_headers_are_present_and_custom_headers_pass_through() {
    let (base, server) = serve_once(ok_response("ok"));

    new_request()
        .url(format!("{base}/"))
        .headers("X-Custom", "yes")
        .send()
        .unwrap();

    let exchange = server.join().unwrap();
    assert!(exchange.request.contains("Host: 127.0.0.1:"));
    assert!(exchange.request.contains("Connection: close\r\n"));
    assert!(exchange.request.contains("Accept-Encoding: identity\r\n"));
    assert!(exchange.request.contains("X-Custom: yes\r\n"));
}

#[test]
fn non_2xx_payload_is_returned_instead_of_an_error() {
    let (base, server) = serve_once(
        b"HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\n\r\nnot found".to_vec(),
    );

    let text = new_request().url(format!("{base}/missing")).send().unwrap();

    assert_eq!(text, "not found");
    server.join().unwrap();
}

#[test]
fn connection_is_released_after_send_returns() {
    let (base, server) = serve_once(ok_response("done"));

    new_request().url(format!("{base}/")).send().unwrap();

    let exchange = server.join().unwrap();
    assert!(exchange.client_closed, "client left the connection open");
}

#[test]
fn response_is_decoded_with_the_configured_charset() {
    // 0xE9 is "é" in ISO-8859-1 and invalid UTF-8.
    let mut response = b"HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\n".to_vec();
    response.push(0xE9);
    let (base, server) = serve_once(response);

    let text = new_request()
        .url(format!("{base}/"))
        .charset("ISO-8859-1")
        .send()
        .unwrap();

    assert_eq!(text, "\u{e9}");
    server.join().unwrap();
}

#[test]
fn head_response_returns_without_waiting_for_a_body() {
    let (base, server) = serve_once(b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\n".to_vec());

    let text = new_request()
        .url(format!("{base}/"))
        .method(RequestBuilder::HEAD)
        .read_timeout(2000)
        .send()
        .unwrap();

    assert_eq!(text, "");
    server.join().unwrap();
}

#[test]
fn malformed_url_fails_before_any_connection() {
    for path in ["ftp://127.0.0.1/x", "127.0.0.1/x", "example.test"] {
        let err = new_request().url(path).send().unwrap_err();
        assert!(matches!(err, Error::MalformedUrl(_)), "accepted {path:?}");
    }
}

#[test]
fn missing_url_is_malformed() {
    assert!(matches!(
        new_request().send().unwrap_err(),
        Error::MalformedUrl(_)
    ));
}

#[test]
fn unknown_charset_fails_before_any_connection() {
    let err = new_request()
        .url("http://127.0.0.1/")
        .charset("no-such-charset")
        .send()
        .unwrap_err();
    assert!(matches!(err, Error::Charset(_)));
}

#[test]
fn refused_connection_is_a_connect_error() {
    // Bind then drop to get a port nothing is listening on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = new_request()
        .url(format!("http://127.0.0.1:{port}/"))
        .send()
        .unwrap_err();
    assert!(matches!(err, Error::Connect { .. }), "got {err:?}");
}

#[test]
fn silent_server_trips_the_read_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        read_request(&mut stream);
        // Never respond; hold the socket open past the client's timeout.
        thread::sleep(Duration::from_millis(500));
    });

    let err = new_request()
        .url(format!("http://{addr}/"))
        .read_timeout(100)
        .send()
        .unwrap_err();

    assert!(
        matches!(
            err,
            Error::Timeout {
                phase: Phase::Read,
                ..
            }
        ),
        "got {err:?}"
    );
    server.join().unwrap();
}
