//! Inbound direction: connection to byte channel.

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::PumpHandle;
use crate::config::PumpConfig;
use crate::eof::{closed_connection, is_eof};
use crate::error::{Error, ErrorKind, Result};
use crate::observer::Observer;

/// Starts a reader pump on `conn` and returns the channel it publishes to.
///
/// Every byte read is sent individually and in order. The channel closes
/// when the connection reaches end of stream; the connection itself is never
/// closed by the reader. Any other read fault also closes the channel, but the pump then
/// finishes with an error, which is how the two cases are told apart.
///
/// Must be called from within a tokio runtime.
pub fn connection_reader<R>(conn: R, config: &PumpConfig) -> (mpsc::Receiver<u8>, PumpHandle)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    connection_reader_until(conn, config, CancellationToken::new())
}

/// [`connection_reader`] that also ends, as at end of stream, once `closed`
/// is cancelled. Pass the writer's [`PumpHandle::closed`] to have the
/// inbound channel close when the writer closes the connection.
pub fn connection_reader_until<R>(
    conn: R,
    config: &PumpConfig,
    closed: CancellationToken,
) -> (mpsc::Receiver<u8>, PumpHandle)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(config.channel_capacity);
    let name = config.name.clone();
    let task = tokio::spawn(read_pump(
        conn,
        tx,
        closed.clone(),
        config.read_buffer_size,
        name.clone(),
        config.observer.clone(),
    ));
    (rx, PumpHandle::new(name, task, closed))
}

async fn read_pump<R>(
    mut conn: R,
    bytes: mpsc::Sender<u8>,
    closed: CancellationToken,
    buffer_size: usize,
    name: String,
    observer: Arc<dyn Observer>,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    log::debug!("[{}] reader started", name);
    let mut buf = vec![0u8; buffer_size];

    loop {
        let read = tokio::select! {
            biased;
            _ = closed.cancelled() => Err(closed_connection()),
            read = conn.read(&mut buf) => read,
        };
        let n = match read {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if is_eof(Some(&e)) => {
                log::debug!("[{}] read ended: {}", name, e);
                break;
            }
            Err(e) => {
                let err = Error::with_source(ErrorKind::Read, e);
                log::error!("[{}] reader stopped: {}", name, err);
                return Err(err);
            }
        };

        log::trace!("[{}] read block of {} bytes", name, n);
        observer.on_block_received(&name, &buf[..n]);

        for &byte in &buf[..n] {
            if bytes.send(byte).await.is_err() {
                log::debug!("[{}] inbound channel dropped by consumer", name);
                return Ok(());
            }
        }
    }

    log::debug!("[{}] reader reached end of stream", name);
    Ok(())
}
