//! Byte-stream connections.
//!
//! # Design
//! The message engine only needs two things from a connection: write all of
//! the request, then read until the peer closes. `ByteStream` captures
//! exactly that, so the engine can run over a `TcpConnection` or over an
//! in-memory stream in tests. A `TcpConnection` owns its socket and shuts
//! it down on drop, so it is released on every exit path.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};

use log::{debug, trace};

use crate::config::ClientConfig;
use crate::error::{is_timeout, HttpClientError, Result};

/// Upper bound on the bytes taken from the socket per read.
pub const RECV_CHUNK_SIZE: usize = 1024;

/// A bidirectional stream carrying exactly one request and one response.
pub trait ByteStream {
    /// Write every byte of `data`.
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read until the peer signals end-of-stream with a zero-length read.
    ///
    /// A read reporting `WouldBlock` or `TimedOut` is returned as
    /// `HttpClientError::Timeout`. A blocking stream only reports those once
    /// a read deadline is set, with one exception: the kernel may abort a
    /// stalled connection with `ETIMEDOUT` even without a deadline, and that
    /// also surfaces as `Timeout`.
    fn receive_all(&mut self) -> Result<Vec<u8>>;
}

/// `send`/`receive_all` over any blocking reader/writer.
impl<T: Read + Write> ByteStream for T {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.write_all(data).map_err(send_error)?;
        self.flush().map_err(send_error)
    }

    fn receive_all(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; RECV_CHUNK_SIZE];
        loop {
            match self.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    trace!("received {n} bytes");
                    buffer.extend_from_slice(&chunk[..n]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if is_timeout(&e) => {
                    return Err(HttpClientError::Timeout("waiting for the response"))
                }
                Err(e) => return Err(HttpClientError::Receive(e)),
            }
        }
        Ok(buffer)
    }
}

fn send_error(e: io::Error) -> HttpClientError {
    if is_timeout(&e) {
        HttpClientError::Timeout("sending the request")
    } else {
        HttpClientError::Send(e)
    }
}

/// An open TCP connection, closed when dropped.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl TcpConnection {
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Shut both directions down and release the socket.
    pub fn close(self) {
        drop(self);
    }
}

impl Read for TcpConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for TcpConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl Drop for TcpConnection {
    fn drop(&mut self) {
        // The peer may already have closed; nothing useful to do on failure.
        let _ = self.stream.shutdown(Shutdown::Both);
        debug!("closed connection to {}", self.peer);
    }
}

/// Open a TCP connection to `host:port`.
///
/// `host` may be a name or an address literal. Every address the name
/// resolves to is tried in order; the last connect error is reported.
pub fn open(host: &str, port: u16, config: &ClientConfig) -> Result<TcpConnection> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|source| HttpClientError::Resolution {
            host: host.to_string(),
            source,
        })?
        .collect();

    let mut last_error = io::Error::new(io::ErrorKind::NotFound, "no addresses to connect to");
    for addr in addrs {
        let attempt = match config.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => {
                stream
                    .set_read_timeout(config.read_timeout)
                    .map_err(HttpClientError::Receive)?;
                stream
                    .set_write_timeout(config.read_timeout)
                    .map_err(HttpClientError::Send)?;
                debug!("connected to {addr}");
                return Ok(TcpConnection { stream, peer: addr });
            }
            Err(e) => {
                debug!("connect to {addr} failed: {e}");
                last_error = e;
            }
        }
    }

    Err(connect_error(host, port, config, last_error))
}

/// Classify a failed connect.
///
/// Only an expired `connect_timeout` counts as a timeout. The OS giving up
/// on an unreachable host (`ETIMEDOUT`) without a configured deadline is a
/// connection failure like any other.
fn connect_error(host: &str, port: u16, config: &ClientConfig, err: io::Error) -> HttpClientError {
    if config.connect_timeout.is_some() && is_timeout(&err) {
        return HttpClientError::Timeout("connecting");
    }
    HttpClientError::Connection {
        host: host.to_string(),
        port,
        source: err,
    }
}
