use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{Error, ErrorKind, Result};

/// Writes the whole block, retrying with the unwritten remainder after short
/// writes, then flushes.
pub(crate) async fn write_block<W>(conn: &mut W, mut block: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    while !block.is_empty() {
        match conn.write(block).await {
            Ok(0) => return Err(Error::new(ErrorKind::WriteZero)),
            Ok(n) => block = &block[n..],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::with_source(ErrorKind::Write, e)),
        }
    }
    conn.flush()
        .await
        .map_err(|e| Error::with_source(ErrorKind::Write, e))
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingWriter;
    use super::*;

    #[tokio::test]
    async fn test_write_block_retries_short_writes() {
        let mut conn = RecordingWriter::new(3);
        write_block(&mut conn, b"hello world").await.unwrap();
        assert_eq!(conn.bytes(), b"hello world");
    }

    #[tokio::test]
    async fn test_write_block_zero_write() {
        let mut conn = RecordingWriter::new(0);
        let err = write_block(&mut conn, b"x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteZero);
    }

    #[tokio::test]
    async fn test_write_block_error() {
        let mut conn = RecordingWriter::failing(io::ErrorKind::BrokenPipe);
        let err = write_block(&mut conn, b"x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Write);
        assert_eq!(err.io_error().unwrap().kind(), io::ErrorKind::BrokenPipe);
    }
}
