//! Minimal HTTP/1.1 GET/POST client on top of raw TCP sockets.
//!
//! # Overview
//! Builds request bytes by hand, writes them to a plain `TcpStream`, reads
//! until the server closes the connection and splits the reply into status
//! code, raw header lines and a UTF-8 body. No HTTP library is involved.
//!
//! # Design
//! - `HttpClient` is stateless; it holds only a `ClientConfig`.
//! - Request construction (`http`) and response framing (`parse`) are pure
//!   functions over strings and bytes.
//! - The network sits behind `ByteStream`, so `HttpClient::exchange` can be
//!   driven by in-memory streams.
//! - One connection per request, always `Connection: close`.

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod http;
pub mod parse;
pub mod target;

pub use client::HttpClient;
pub use config::ClientConfig;
pub use connection::{open, ByteStream, TcpConnection};
pub use error::HttpClientError;
pub use http::{build_get_request, build_post_request, HttpMethod, HttpRequest, HttpResponse};
pub use parse::{parse_body, parse_headers, parse_response, parse_status_code};
pub use target::{resolve, ParsedUrl, ResolvePolicy};
