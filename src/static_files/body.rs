//! Streaming file bodies.

use std::io::SeekFrom;

use axum::body::{Body, Bytes};
use futures_util::stream;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};

/// Read size per chunk; bounds memory per in-flight download.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Stream `reader` to the client in `CHUNK_SIZE` pieces.
///
/// Dropping the body (client went away) drops the reader, which closes the
/// file.
pub fn reader_body<R>(reader: R) -> Body
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let chunks = stream::unfold(Some(reader), |state| async move {
        let mut reader = state?;
        let mut buf = vec![0u8; CHUNK_SIZE];
        match reader.read(&mut buf).await {
            Ok(0) => None,
            Ok(n) => {
                buf.truncate(n);
                Some((Ok(Bytes::from(buf)), Some(reader)))
            }
            Err(e) => Some((Err(e), None)),
        }
    });
    Body::from_stream(chunks)
}

/// Stream `len` bytes of `file` starting at `start`.
pub async fn file_body(mut file: File, start: u64, len: u64) -> std::io::Result<Body> {
    if start > 0 {
        file.seek(SeekFrom::Start(start)).await?;
    }
    Ok(reader_body(file.take(len)))
}
