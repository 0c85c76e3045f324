//! Outbound direction: byte-block channel to connection.

use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::PumpHandle;
use crate::config::PumpConfig;
use crate::error::Result;
use crate::io::write_block;
use crate::observer::Observer;

/// Starts a writer pump on `conn` and returns the channel that feeds it.
///
/// Blocks are written whole and in the order they were sent. Once every
/// sender is dropped the pump shuts the connection down, cancels
/// [`PumpHandle::closed`] so a paired reader stops too, and exits. A write
/// fault stops the pump with an error and closes the channel, so later sends
/// fail.
///
/// Must be called from within a tokio runtime.
pub fn connection_writer<W>(conn: W, config: &PumpConfig) -> (mpsc::Sender<Vec<u8>>, PumpHandle)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(config.channel_capacity);
    let name = config.name.clone();
    let closed = CancellationToken::new();
    let task = tokio::spawn(write_pump(
        conn,
        rx,
        closed.clone(),
        name.clone(),
        config.observer.clone(),
    ));
    (tx, PumpHandle::new(name, task, closed))
}

async fn write_pump<W>(
    mut conn: W,
    mut blocks: mpsc::Receiver<Vec<u8>>,
    closed: CancellationToken,
    name: String,
    observer: Arc<dyn Observer>,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    log::debug!("[{}] writer started", name);

    while let Some(block) = blocks.recv().await {
        if let Err(e) = write_block(&mut conn, &block).await {
            log::error!("[{}] writer stopped: {}", name, e);
            return Err(e);
        }
        log::trace!("[{}] wrote block of {} bytes", name, block.len());
        observer.on_block_sent(&name, &block);
    }

    if let Err(e) = conn.shutdown().await {
        log::warn!("[{}] failed to close connection: {}", name, e);
    }
    closed.cancel();
    log::debug!("[{}] writer finished, connection closed", name);
    Ok(())
}
