//! Both pumps on one stream.

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::compat::{Compat, FuturesAsyncReadCompatExt};

use crate::channel::{PumpHandle, connection_reader_until, connection_writer};
use crate::config::PumpConfig;

/// A stream turned into channels.
#[derive(Debug)]
pub struct Connection {
    /// Byte-blocks to write. Drop it (and every clone) to close the stream.
    pub outbound: mpsc::Sender<Vec<u8>>,
    /// Bytes read. Closes at end of stream or once the writer closed the
    /// connection.
    pub inbound: mpsc::Receiver<u8>,
    pub writer: PumpHandle,
    pub reader: PumpHandle,
}

impl Connection {
    /// Waits for both pumps, writer first, and returns the first failure.
    pub async fn join(self) -> crate::Result<()> {
        let Connection {
            outbound,
            inbound,
            writer,
            reader,
        } = self;
        drop(outbound);
        drop(inbound);
        let written = writer.join().await;
        let read = reader.join().await;
        written.and(read)
    }
}

/// Splits `stream` and starts a writer pump and a reader pump on it.
///
/// Dropping `outbound` closes the whole connection: the writer shuts it down
/// and the inbound channel then closes, whether or not the peer is done.
///
/// Must be called from within a tokio runtime.
pub fn connect<S>(stream: S, config: &PumpConfig) -> Connection
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (read_half, write_half) = tokio::io::split(stream);
    let (outbound, writer) = connection_writer(write_half, config);
    let (inbound, reader) = connection_reader_until(read_half, config, writer.closed());
    log::debug!("[{}] pumps started", config.name);
    Connection {
        outbound,
        inbound,
        writer,
        reader,
    }
}

/// [`connect`] for streams implementing the `futures` I/O traits.
pub fn connect_compat<S>(stream: S, config: &PumpConfig) -> Connection
where
    S: futures::io::AsyncRead + futures::io::AsyncWrite + Send + 'static,
{
    let stream: Compat<S> = stream.compat();
    connect(stream, config)
}
