//! One-shot HTTP/1.1 client over raw TCP.
//!
//! # Design
//! `HttpClient` holds only its `ClientConfig` and carries no state between
//! calls. `execute` runs the whole pipeline for a single request:
//! parse the URL, resolve, open a connection, build and send the request,
//! read until the server closes, parse. The connection is a local value,
//! so it is closed on every return path. `exchange` is the part of the
//! pipeline that runs after the connection exists, generic over
//! `ByteStream` so it can be driven without a network.

use log::debug;

use crate::config::ClientConfig;
use crate::connection::{self, ByteStream};
use crate::error::Result;
use crate::http::{build_get_request, build_post_request, HttpMethod, HttpRequest, HttpResponse};
use crate::parse::parse_response;
use crate::target::ParsedUrl;

/// Synchronous, stateless GET/POST client.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the request `execute` would send for `url`, without any I/O.
    ///
    /// `args` is only used by POST.
    pub fn build_request(
        &self,
        url: &ParsedUrl,
        method: HttpMethod,
        args: Option<&[(String, String)]>,
    ) -> HttpRequest {
        let target = url.request_target();
        match method {
            HttpMethod::Get => build_get_request(&target, &url.netloc),
            HttpMethod::Post => build_post_request(&target, &url.netloc, args),
        }
    }

    /// Send one request to `url` and return the parsed response.
    pub fn execute(
        &self,
        url: &str,
        method: HttpMethod,
        args: Option<&[(String, String)]>,
    ) -> Result<HttpResponse> {
        let parsed = ParsedUrl::parse(url)?;
        let (host, port) = parsed.resolve(self.config.resolve_policy)?;
        let request = self.build_request(&parsed, method, args);

        debug!("{method} {url} via {host}:{port}");
        let mut conn = connection::open(&host, port, &self.config)?;
        self.exchange(&mut conn, &request)
    }

    /// Write `request` to `stream`, read the full reply and parse it.
    pub fn exchange<S: ByteStream>(&self, stream: &mut S, request: &HttpRequest) -> Result<HttpResponse> {
        let bytes = request.to_bytes();
        stream.send(&bytes)?;
        debug!("sent {} bytes", bytes.len());

        let raw = stream.receive_all()?;
        debug!("received {} bytes", raw.len());

        let response = parse_response(raw)?;
        debug!("status {}", response.status);
        Ok(response)
    }

    pub fn get(&self, url: &str) -> Result<HttpResponse> {
        self.execute(url, HttpMethod::Get, None)
    }

    pub fn post(&self, url: &str, args: Option<&[(String, String)]>) -> Result<HttpResponse> {
        self.execute(url, HttpMethod::Post, args)
    }

    /// Dispatch on a verb string: `POST` posts, anything else gets.
    pub fn command(&self, url: &str, verb: &str, args: Option<&[(String, String)]>) -> Result<HttpResponse> {
        self.execute(url, HttpMethod::from_verb(verb), args)
    }
}
