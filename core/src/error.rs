//! Error types for the raw-socket HTTP client.
//!
//! # Design
//! Every stage of the request pipeline has its own variant so callers can
//! tell "the server is unreachable" apart from "the server answered with
//! something that is not HTTP". Nothing inside the pipeline catches or
//! retries; the first failure is returned to the caller as-is.

use std::io;

use thiserror::Error;

/// Errors returned by `HttpClient` and the free-standing parse functions.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The URL could not be parsed, or it has no host component.
    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The host name could not be resolved to a network address.
    #[error("could not resolve `{host}`")]
    Resolution {
        host: String,
        #[source]
        source: io::Error,
    },

    /// The TCP connection was refused or the destination is unreachable.
    #[error("could not connect to {host}:{port}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Writing the request to the socket failed.
    #[error("failed to send request")]
    Send(#[source] io::Error),

    /// Reading the response from the socket failed.
    #[error("failed to receive response")]
    Receive(#[source] io::Error),

    /// A configured connect or read deadline expired.
    #[error("timed out while {0}")]
    Timeout(&'static str),

    /// The response has no usable status line or no header/body separator.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The response bytes are not valid UTF-8 text.
    #[error("response is not valid UTF-8")]
    Decode(#[from] std::string::FromUtf8Error),
}

impl HttpClientError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        HttpClientError::MalformedResponse(reason.into())
    }
}

/// Returns true for the error kinds a socket reports when its deadline expires.
pub(crate) fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

pub type Result<T, E = HttpClientError> = std::result::Result<T, E>;
