//! Request targets: URL parsing and host/port resolution.
//!
//! # Design
//! The `url` crate validates the URL and supplies the path and query. The
//! network location is also kept as the literal text the caller typed,
//! because that literal is what goes into the `Host` header and, when no
//! port is given, what is handed to the connection unresolved.

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

use log::debug;
use url::{Host, Url};

use crate::error::{HttpClientError, Result};

pub const DEFAULT_PORT: u16 = 80;

/// When `resolve` turns the host name into a network address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolvePolicy {
    /// Resolve only when the URL names an explicit port; otherwise return
    /// the literal host and leave the lookup to the connection.
    #[default]
    Observed,
    /// Always resolve to an address.
    Always,
}

/// The pieces of an absolute URL needed to issue one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub explicit_port: bool,
    pub netloc: String,
    pub path: String,
    pub query: Option<String>,
}

impl ParsedUrl {
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| HttpClientError::InvalidUrl {
            url: input.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(input).map_err(|e| invalid(&e.to_string()))?;
        let host = match url.host() {
            Some(Host::Domain(_)) | Some(Host::Ipv4(_)) => literal_host(input, &url),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            None => return Err(invalid("missing host")),
        };
        let netloc = literal_netloc(input, url.scheme()).unwrap_or_else(|| normalized_netloc(&url));
        let explicit = explicit_port(&netloc);

        let path = if url.path().is_empty() {
            "/".to_string()
        } else {
            url.path().to_string()
        };

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port: explicit.unwrap_or(DEFAULT_PORT),
            explicit_port: explicit.is_some(),
            netloc,
            path,
            query: url.query().map(str::to_string),
        })
    }

    /// Path plus query string, as written on the request line.
    pub fn request_target(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{query}", self.path),
            None => self.path.clone(),
        }
    }

    /// Host and port to connect to under the given policy.
    pub fn resolve(&self, policy: ResolvePolicy) -> Result<(String, u16)> {
        if !self.explicit_port && policy == ResolvePolicy::Observed {
            return Ok((self.host.clone(), DEFAULT_PORT));
        }
        let addr = lookup(&self.host, self.port)?;
        debug!("resolved {} to {}", self.host, addr.ip());
        Ok((addr.ip().to_string(), self.port))
    }
}

/// Resolve `url` to the host and port a connection should be opened to.
///
/// Without an explicit port this returns the literal host and port 80 and
/// performs no lookup. With one, the host is resolved to an address.
pub fn resolve(url: &str) -> Result<(String, u16)> {
    ParsedUrl::parse(url)?.resolve(ResolvePolicy::Observed)
}

/// Look up `host`, preferring an IPv4 address when several are returned.
pub(crate) fn lookup(host: &str, port: u16) -> Result<SocketAddr> {
    let resolution = |source| HttpClientError::Resolution {
        host: host.to_string(),
        source,
    };
    let addrs: Vec<SocketAddr> = (host, port).to_socket_addrs().map_err(resolution)?.collect();
    addrs
        .iter()
        .find(|addr| matches!(addr.ip(), IpAddr::V4(_)))
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| {
            resolution(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no addresses returned",
            ))
        })
}

/// The authority section of `input` with any userinfo removed.
///
/// Only a `://` directly after the scheme opens an authority; anything
/// else (`http:host/a://b`) yields `None`.
fn literal_netloc(input: &str, scheme: &str) -> Option<String> {
    let input = input.trim_start_matches(|c: char| c <= ' ');
    if !input.get(..scheme.len())?.eq_ignore_ascii_case(scheme) {
        return None;
    }
    let rest = input[scheme.len()..].strip_prefix("://")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    let netloc = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    (!netloc.is_empty()).then(|| netloc.to_string())
}

/// The host as typed, falling back to the normalized form.
fn literal_host(input: &str, url: &Url) -> String {
    let normalized = url.host_str().unwrap_or_default();
    literal_netloc(input, url.scheme())
        .map(|netloc| match netloc.rsplit_once(':') {
            Some((host, port)) if port.bytes().all(|b| b.is_ascii_digit()) => host.to_string(),
            _ => netloc,
        })
        .filter(|host| host.eq_ignore_ascii_case(normalized))
        .unwrap_or_else(|| normalized.to_string())
}

/// `host[:port]` rebuilt from the parsed URL.
fn normalized_netloc(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

fn explicit_port(netloc: &str) -> Option<u16> {
    let (_, port) = netloc.rsplit_once(':')?;
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    port.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_port_uses_literal_host_and_port_80() {
        assert_eq!(resolve("http://example.com/x").unwrap(), ("example.com".to_string(), 80));
        assert_eq!(
            resolve("http://Some-Host.Example/").unwrap(),
            ("Some-Host.Example".to_string(), 80)
        );
    }

    #[test]
    fn explicit_port_resolves_address() {
        let (host, port) = resolve("http://127.0.0.1:8080/path").unwrap();
        assert_eq!(host, "127.0.0.1");
        assert_eq!(port, 8080);

        let (host, port) = resolve("http://localhost:3000").unwrap();
        let ip: IpAddr = host.parse().unwrap();
        assert!(ip.is_loopback());
        assert_eq!(port, 3000);
    }

    #[test]
    fn explicit_port_80_still_counts_as_explicit() {
        let parsed = ParsedUrl::parse("http://127.0.0.1:80/").unwrap();
        assert!(parsed.explicit_port);
        assert_eq!(parsed.netloc, "127.0.0.1:80");
    }

    #[test]
    fn always_policy_resolves_without_port() {
        let parsed = ParsedUrl::parse("http://localhost/").unwrap();
        let (host, port) = parsed.resolve(ResolvePolicy::Always).unwrap();
        assert!(host.parse::<IpAddr>().unwrap().is_loopback());
        assert_eq!(port, 80);
    }

    #[test]
    fn unresolvable_host_is_a_resolution_error() {
        let err = resolve("http://no-such-host.invalid:8080/").unwrap_err();
        assert!(matches!(err, HttpClientError::Resolution { .. }));
    }

    #[test]
    fn parse_fills_defaults() {
        let parsed = ParsedUrl::parse("http://example.com").unwrap();
        assert_eq!(parsed.scheme, "http");
        assert_eq!(parsed.host, "example.com");
        assert_eq!(parsed.port, 80);
        assert!(!parsed.explicit_port);
        assert_eq!(parsed.netloc, "example.com");
        assert_eq!(parsed.path, "/");
        assert_eq!(parsed.query, None);
    }

    #[test]
    fn parse_keeps_query_and_strips_userinfo() {
        let parsed = ParsedUrl::parse("http://user:pw@example.com:8000/a/b?x=1&y=2#frag").unwrap();
        assert_eq!(parsed.netloc, "example.com:8000");
        assert_eq!(parsed.host, "example.com");
        assert_eq!(parsed.port, 8000);
        assert_eq!(parsed.path, "/a/b");
        assert_eq!(parsed.request_target(), "/a/b?x=1&y=2");
    }

    #[test]
    fn netloc_comes_from_the_authority_only() {
        let parsed = ParsedUrl::parse("http:example.com/a://b").unwrap();
        assert_eq!(parsed.host, "example.com");
        assert_eq!(parsed.netloc, "example.com");
        assert_eq!(parsed.path, "/a://b");

        let parsed = ParsedUrl::parse("http:example.com:8080/x").unwrap();
        assert_eq!(parsed.netloc, "example.com:8080");
        assert_eq!(parsed.port, 8080);

        let parsed = ParsedUrl::parse("http://example.com/redirect?to=http://other.test/").unwrap();
        assert_eq!(parsed.netloc, "example.com");
    }

    #[test]
    fn dot_segments_are_removed_from_path() {
        let parsed = ParsedUrl::parse("http://example.com/a/../b/./c").unwrap();
        assert_eq!(parsed.path, "/b/c");
    }

    #[test]
    fn ipv6_host_is_unbracketed() {
        let parsed = ParsedUrl::parse("http://[::1]:9000/").unwrap();
        assert_eq!(parsed.host, "::1");
        assert_eq!(parsed.netloc, "[::1]:9000");
        assert_eq!(parsed.port, 9000);
    }

    #[test]
    fn relative_or_hostless_urls_are_invalid() {
        for input in ["example.com/x", "/just/a/path", "mailto:someone@example.com"] {
            let err = ParsedUrl::parse(input).unwrap_err();
            assert!(matches!(err, HttpClientError::InvalidUrl { .. }), "{input}");
        }
    }
}
