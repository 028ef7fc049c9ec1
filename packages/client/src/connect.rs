//! Blocking connection establishment.
//!
//! One connection per execution: resolve addresses, connect with the
//! configured bound, install the read timeout, and for `https` wrap the
//! socket in rustls with the trust-all configuration and drive the
//! handshake to completion. The connection is released when the stream is
//! dropped, on every exit path.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use rustls::pki_types::ServerName;
use rustls::{ClientConnection, StreamOwned};
use url::Url;

use crate::error::{Error, Phase, Result};
use crate::tls;

/// A single-use blocking stream, plain or TLS.
pub(crate) enum Stream {
    Plain(TcpStream),
    Tls(StreamOwned<ClientConnection, TcpStream>),
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Stream::Plain(s) => s.read(buf),
            Stream::Tls(s) => s.read(buf),
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Stream::Plain(s) => s.write(buf),
            Stream::Tls(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Stream::Plain(s) => s.flush(),
            Stream::Tls(s) => s.flush(),
        }
    }
}

/// Opens a connection to `url`, TLS-wrapped when the scheme is `https`.
pub(crate) fn open(url: &Url, connect_timeout: Duration, read_timeout: Duration) -> Result<Stream> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::MalformedUrl(url.to_string()))?
        .to_string();

    let addrs = url.socket_addrs(|| None).map_err(|source| Error::Connect {
        host: host.clone(),
        source,
    })?;

    let mut last_err: Option<io::Error> = None;
    let mut connected: Option<TcpStream> = None;
    for addr in addrs {
        tracing::debug!(%host, %addr, "connecting");
        match TcpStream::connect_timeout(&addr, connect_timeout) {
            Ok(stream) => {
                connected = Some(stream);
                break;
            }
            Err(e) => last_err = Some(e),
        }
    }
    let tcp = match connected {
        Some(stream) => stream,
        None => {
            let source = last_err
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses resolved"));
            return Err(match source.kind() {
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Error::Timeout {
                    phase: Phase::Connect,
                    limit: connect_timeout,
                },
                _ => Error::Connect { host, source },
            });
        }
    };

    tcp.set_read_timeout(Some(read_timeout))
        .map_err(|source| Error::Connect {
            host: host.clone(),
            source,
        })?;

    if url.scheme() == "https" {
        secure(tcp, host, read_timeout).map(Stream::Tls)
    } else {
        Ok(Stream::Plain(tcp))
    }
}

/// Wraps an established socket in the trust-all TLS configuration and runs
/// the handshake, so handshake failures surface here rather than on the
/// first write.
fn secure(
    tcp: TcpStream,
    host: String,
    read_timeout: Duration,
) -> Result<StreamOwned<ClientConnection, TcpStream>> {
    let server_name = ServerName::try_from(host.clone()).map_err(|e| Error::Connect {
        host: host.clone(),
        source: io::Error::new(io::ErrorKind::InvalidInput, e),
    })?;
    let conn =
        ClientConnection::new(tls::trust_all_config(), server_name).map_err(|e| Error::Connect {
            host: host.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

    let mut stream = StreamOwned::new(conn, tcp);
    while stream.conn.is_handshaking() {
        stream.conn.complete_io(&mut stream.sock).map_err(|source| {
            if matches!(
                source.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ) {
                Error::Timeout {
                    phase: Phase::Handshake,
                    limit: read_timeout,
                }
            } else {
                Error::Connect {
                    host: host.clone(),
                    source,
                }
            }
        })?;
    }
    tracing::debug!(%host, "tls handshake complete");
    Ok(stream)
}
