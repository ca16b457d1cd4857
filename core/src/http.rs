//! HTTP message types and request construction.
//!
//! # Design
//! Requests are plain data: `build_get_request` and `build_post_request`
//! produce an `HttpRequest` whose header order is fixed, and
//! `HttpRequest::to_bytes` renders it to the exact bytes written on the
//! socket. Responses keep their header lines as raw wire text; only the
//! status code and body are interpreted.

use std::fmt;

use serde::Serialize;
use url::form_urlencoded;

pub const CRLF: &str = "\r\n";
pub const HEADER_TERMINATOR: &str = "\r\n\r\n";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Map a verb given on the command line to a method.
    ///
    /// Only the exact string `POST` selects `Post`; every other verb is
    /// treated as `Get`.
    pub fn from_verb(verb: &str) -> Self {
        if verb == "POST" {
            HttpMethod::Post
        } else {
            HttpMethod::Get
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP/1.1 request described as plain data.
///
/// Header names are stored with canonical casing in the order they are
/// written. `body` is `None` for GET and for a POST without form arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Render the request to the bytes sent on the wire.
    ///
    /// A non-empty body is followed by an extra blank line.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!("{} {} HTTP/1.1{CRLF}", self.method, self.path);
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str(CRLF);
        }
        out.push_str(CRLF);
        if let Some(body) = self.body.as_deref().filter(|b| !b.is_empty()) {
            out.push_str(body);
            out.push_str(HEADER_TERMINATOR);
        }
        out.into_bytes()
    }
}

fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// Build a GET request for `path` on `host`.
pub fn build_get_request(path: &str, host: &str) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        path: normalize_path(path),
        headers: vec![
            ("Host".to_string(), host.to_string()),
            ("Accept".to_string(), "*/*".to_string()),
            ("Connection".to_string(), "close".to_string()),
        ],
        body: None,
    }
}

/// Build a POST request carrying `args` as a url-encoded form.
///
/// `None` and an empty slice both produce `Content-Length: 0` with no body.
pub fn build_post_request(path: &str, host: &str, args: Option<&[(String, String)]>) -> HttpRequest {
    let content = match args {
        Some(args) if !args.is_empty() => Some(encode_form(args)),
        _ => None,
    };
    let length = content.as_ref().map_or(0, String::len);

    HttpRequest {
        method: HttpMethod::Post,
        path: normalize_path(path),
        headers: vec![
            ("Host".to_string(), host.to_string()),
            ("Connection".to_string(), "close".to_string()),
            ("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ("Content-Length".to_string(), length.to_string()),
        ],
        body: content,
    }
}

/// Encode ordered pairs as `application/x-www-form-urlencoded` content.
pub fn encode_form(args: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(args)
        .finish()
}

/// An HTTP response split into status code, raw header lines and text body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<String>,
    pub body: String,
}

impl HttpResponse {
    /// The first header line, e.g. `HTTP/1.1 200 OK`.
    pub fn status_line(&self) -> Option<&str> {
        self.headers.first().map(String::as_str)
    }

    /// Value of the first header line whose name matches, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }
}

impl fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.headers {
            writeln!(f, "{line}")?;
        }
        writeln!(f)?;
        f.write_str(&self.body)
    }
}
