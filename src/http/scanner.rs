//! Header block scanner.
//!
//! Reads one byte at a time so the source is left positioned exactly on the
//! first body byte. A line-oriented reader would buffer past the blank line
//! and swallow part of the body.

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Upper bound on a header block before the connection is dropped.
pub const MAX_HEAD_BYTES: usize = 64 * 1024;

const DELIMITER_LEN: usize = 4;

/// Progress through the `\r\n\r\n` delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Cr,
    CrLf,
    CrLfCr,
    Done,
}

impl ScanState {
    /// Feeds one byte into the matcher.
    ///
    /// A `\r` that breaks a partial match restarts it at `Cr` rather than
    /// falling back to `Idle`.
    pub fn advance(self, byte: u8) -> ScanState {
        match (self, byte) {
            (ScanState::CrLf, b'\r') => ScanState::CrLfCr,
            (_, b'\r') => ScanState::Cr,
            (ScanState::Cr, b'\n') => ScanState::CrLf,
            (ScanState::CrLfCr, b'\n') => ScanState::Done,
            _ => ScanState::Idle,
        }
    }
}

/// Reads the header block preceding the first `\r\n\r\n`.
///
/// The delimiter itself is consumed but not returned. If the stream ends
/// first, everything read so far is returned; an empty result means the
/// peer closed or sent nothing.
pub async fn read_head<R>(reader: &mut R) -> io::Result<BytesMut>
where
    R: AsyncRead + Unpin,
{
    let mut head = BytesMut::with_capacity(1024);
    let mut state = ScanState::Idle;
    let mut byte = [0u8; 1];

    loop {
        let n = reader.read(&mut byte).await?;
        if n == 0 {
            return Ok(head);
        }

        head.extend_from_slice(&byte);
        state = state.advance(byte[0]);

        if state == ScanState::Done {
            head.truncate(head.len() - DELIMITER_LEN);
            return Ok(head);
        }

        if head.len() > MAX_HEAD_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "request header block too large",
            ));
        }
    }
}
