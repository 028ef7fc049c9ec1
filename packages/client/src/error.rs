//! Error taxonomy for request execution.
//!
//! Every failure is surfaced to the caller exactly once; nothing is retried
//! internally. I/O failures carry the execution phase they were observed in.

use std::io;
use std::time::Duration;

/// A `Result` alias where the `Err` case is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Execution phase an I/O failure was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// TCP connection establishment.
    Connect,
    /// TLS handshake.
    Handshake,
    /// Writing the request head and body.
    Write,
    /// Reading the response.
    Read,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Connect => "connect",
            Phase::Handshake => "tls handshake",
            Phase::Write => "write",
            Phase::Read => "read",
        };
        f.write_str(name)
    }
}

/// Errors produced while building or executing a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The resolved path does not look like an http(s) URL. Raised before
    /// any network I/O.
    #[error("not an http(s) url: {0}")]
    MalformedUrl(String),

    /// Transport-level failure to establish a connection (DNS, refusal,
    /// TLS handshake rejection).
    #[error("failed to connect to {host}")]
    Connect {
        host: String,
        #[source]
        source: io::Error,
    },

    /// A connect or read operation exceeded its configured bound.
    #[error("{phase} timed out after {limit:?}")]
    Timeout { phase: Phase, limit: Duration },

    /// I/O failure during the write or read phase.
    #[error("i/o failure during {phase}")]
    Io {
        phase: Phase,
        #[source]
        source: io::Error,
    },

    /// The configured charset label is not a known encoding.
    #[error("unsupported charset label: {0}")]
    Charset(String),

    /// The request body or a form parameter cannot be represented in the
    /// configured charset.
    #[error("content not representable in charset {charset}")]
    Encode { charset: String },

    /// The server's response could not be parsed as HTTP/1.1.
    #[error("malformed http response: {0}")]
    Protocol(String),
}

impl Error {
    /// Classifies an I/O failure, turning timeout kinds into [`Error::Timeout`].
    ///
    /// Read timeouts surface as `WouldBlock` on Unix and `TimedOut` on
    /// Windows; both map to the same error.
    pub(crate) fn from_io(phase: Phase, limit: Duration, source: io::Error) -> Error {
        match source.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Error::Timeout { phase, limit },
            _ => Error::Io { phase, source },
        }
    }
}
