use crate::http::request::{Method, Request};
use std::collections::HashMap;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("request line has fewer than two tokens")]
    InvalidRequestLine,
}

/// Parses a header block (without its terminating blank line) into a
/// request with an empty body.
///
/// Each line is decoded on its own, so a non-UTF-8 header value cannot
/// change how the request line or other headers decode. The request target
/// is also kept as raw bytes.
pub fn parse_request_head(head: &[u8]) -> Result<Request, ParseError> {
    let mut lines = split_crlf(head);

    // Request line: method, target, optional version. Trailing empty tokens
    // are dropped so "GET " counts as a single token.
    let request_line = lines.next().unwrap_or_default();
    let mut parts: Vec<&[u8]> = request_line.split(|&b| b == b' ').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }

    if parts.len() < 2 {
        return Err(ParseError::InvalidRequestLine);
    }

    let method = Method::parse(&decode_header_text(parts[0]));
    let target = parts[1].to_vec();
    let path = decode_header_text(parts[1]);
    let version = parts
        .get(2)
        .map(|v| decode_header_text(v))
        .unwrap_or_else(|| "HTTP/1.1".to_string());

    // Headers; lines without a colon are skipped
    let mut headers = HashMap::new();

    for line in lines {
        let Some(colon) = line.iter().position(|&b| b == b':') else {
            continue;
        };
        let (key, value) = (&line[..colon], &line[colon + 1..]);

        headers.insert(
            decode_header_text(key).trim().to_ascii_lowercase(),
            decode_header_text(value).trim().to_string(),
        );
    }

    Ok(Request {
        method,
        path,
        target,
        version,
        headers,
        body: Vec::new(),
    })
}

/// Splits on `\r\n`. A lone `\r` or `\n` stays inside its line.
fn split_crlf(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = Some(bytes);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.windows(2).position(|w| w == b"\r\n") {
            Some(i) => {
                rest = Some(&current[i + 2..]);
                Some(&current[..i])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

/// Decodes header bytes as UTF-8 when valid, else one char per byte.
///
/// The fallback is ISO-8859-1, which maps every byte to a char, so no input
/// byte is ever lost.
pub fn decode_header_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
