//! Content-encoding negotiation and header text encoding.

use std::io::{self, Write};

use flate2::write::GzEncoder;
use flate2::Compression;

/// True when a comma-separated `Accept-Encoding` value lists gzip.
///
/// Tokens are trimmed and lower-cased; any token starting with `gzip`
/// matches, so `gzip;q=1.0` counts.
pub fn accepts_gzip(accept_encoding: &str) -> bool {
    accept_encoding
        .split(',')
        .map(|token| token.trim().to_ascii_lowercase())
        .any(|token| token.starts_with("gzip"))
}

/// Compresses `data` into a gzip container.
pub fn gzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Encodes header text one byte per char (ISO-8859-1).
///
/// Chars above U+00FF cannot be represented and are written as `?`.
pub fn latin1_bytes(text: &str) -> impl Iterator<Item = u8> + '_ {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
}
