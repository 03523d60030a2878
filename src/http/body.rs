use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

/// Reads up to `len` body bytes, looping over short reads.
///
/// Stops early only when the stream ends; the caller gets whatever arrived
/// and can compare its length with `len`.
pub async fn read_body<R>(reader: &mut R, len: usize) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut body = Vec::with_capacity(len.min(64 * 1024));
    if len == 0 {
        return Ok(body);
    }

    let limit = u64::try_from(len).unwrap_or(u64::MAX);
    reader.take(limit).read_to_end(&mut body).await?;
    Ok(body)
}
