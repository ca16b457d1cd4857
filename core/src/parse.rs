//! Response framing: status line, raw header lines, body.
//!
//! The whole response is buffered before any of these run; there is no
//! incremental parsing. Everything up to the first `\r\n\r\n` is the header
//! block, everything after it is the body.

use log::warn;

use crate::error::{HttpClientError, Result};
use crate::http::{HttpResponse, CRLF, HEADER_TERMINATOR};

/// Decode the raw response bytes as UTF-8 text.
pub fn decode(raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw).map_err(|e| {
        warn!("response is not valid UTF-8 at byte {}", e.utf8_error().valid_up_to());
        HttpClientError::from(e)
    })
}

/// Parse the numeric code out of the status line, e.g. `200` from `HTTP/1.1 200 OK`.
pub fn parse_status_code(raw: &str) -> Result<u16> {
    let status_line = raw.split(CRLF).next().unwrap_or_default();
    let token = status_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| HttpClientError::malformed(format!("no status code in `{status_line}`")))?;
    token
        .parse()
        .map_err(|_| HttpClientError::malformed(format!("status code `{token}` is not numeric")))
}

/// Return every line of the header block, status line included, as sent.
///
/// Without a separator the whole input is treated as the header block.
pub fn parse_headers(raw: &str) -> Vec<String> {
    let block = raw
        .split_once(HEADER_TERMINATOR)
        .map_or(raw, |(headers, _)| headers);
    block.split(CRLF).map(str::to_string).collect()
}

/// Return the text after the first header/body separator.
pub fn parse_body(raw: &str) -> Result<String> {
    raw.split_once(HEADER_TERMINATOR)
        .map(|(_, body)| body.to_string())
        .ok_or_else(|| HttpClientError::malformed("missing header/body separator"))
}

/// Decode and split a fully buffered response.
pub fn parse_response(raw: Vec<u8>) -> Result<HttpResponse> {
    let text = decode(raw)?;
    let status = parse_status_code(&text)?;
    let body = parse_body(&text)?;
    let headers = parse_headers(&text);
    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello";

    #[test]
    fn simple_response() {
        assert_eq!(parse_status_code(SIMPLE).unwrap(), 200);
        assert_eq!(
            parse_headers(SIMPLE),
            vec!["HTTP/1.1 200 OK", "Content-Type: text/plain"]
        );
        assert_eq!(parse_body(SIMPLE).unwrap(), "hello");
    }

    #[test]
    fn http_1_0_status_line() {
        let raw = "HTTP/1.0 404 Not Found\r\n\r\n";
        assert_eq!(parse_status_code(raw).unwrap(), 404);
        assert_eq!(parse_body(raw).unwrap(), "");
        assert_eq!(parse_headers(raw), vec!["HTTP/1.0 404 Not Found"]);
    }

    #[test]
    fn status_line_without_reason_phrase() {
        assert_eq!(parse_status_code("HTTP/1.1 204\r\n\r\n").unwrap(), 204);
    }

    #[test]
    fn missing_status_code_is_malformed() {
        let err = parse_status_code("HTTP/1.1\r\n\r\n").unwrap_err();
        assert!(matches!(err, HttpClientError::MalformedResponse(_)));
        let err = parse_status_code("").unwrap_err();
        assert!(matches!(err, HttpClientError::MalformedResponse(_)));
    }

    #[test]
    fn non_numeric_status_code_is_malformed() {
        let err = parse_status_code("HTTP/1.1 OK 200\r\n\r\n").unwrap_err();
        assert!(matches!(err, HttpClientError::MalformedResponse(_)));
    }

    #[test]
    fn missing_separator_is_malformed() {
        let err = parse_body("HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n").unwrap_err();
        assert!(matches!(err, HttpClientError::MalformedResponse(_)));
    }

    #[test]
    fn body_keeps_later_blank_lines() {
        let raw = "HTTP/1.1 200 OK\r\n\r\nfirst\r\n\r\nsecond";
        assert_eq!(parse_body(raw).unwrap(), "first\r\n\r\nsecond");
        assert_eq!(parse_headers(raw), vec!["HTTP/1.1 200 OK"]);
    }

    #[test]
    fn header_lines_are_not_normalized() {
        let raw = "HTTP/1.1 200 OK\r\nX-Odd:  spaced value \r\nset-cookie: a=b\r\n\r\n";
        assert_eq!(
            parse_headers(raw),
            vec!["HTTP/1.1 200 OK", "X-Odd:  spaced value ", "set-cookie: a=b"]
        );
    }

    #[test]
    fn parse_response_collects_all_parts() {
        let response = parse_response(SIMPLE.as_bytes().to_vec()).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.headers.len(), 2);
        assert_eq!(response.body, "hello");
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let mut raw = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
        raw.extend_from_slice(&[0xff, 0xfe, 0x00]);
        let err = parse_response(raw).unwrap_err();
        assert!(matches!(err, HttpClientError::Decode(_)));
    }
}
