//! Connection pumps.
//!
//! [`connection_writer`] drains a channel of byte-blocks into the write half
//! of a connection, [`connection_reader`] drains the read half into a
//! channel of bytes. Each runs as its own task and reports how it ended
//! through a [`PumpHandle`].
//!
//! The writer owns closing the connection. Once it has shut the connection
//! down it cancels its close token; a reader started with
//! [`connection_reader_until`] on that token stops reading and closes the
//! inbound channel as at end of stream.

mod receiver;
mod sender;

pub use receiver::{connection_reader, connection_reader_until};
pub use sender::connection_writer;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, ErrorKind, Result};

/// Handle to a running pump task.
///
/// A pump that stops because of a connection fault finishes with `Err`;
/// reaching end of stream or losing its channel peer is `Ok(())`.
#[derive(Debug)]
pub struct PumpHandle {
    name: String,
    task: JoinHandle<Result<()>>,
    closed: CancellationToken,
}

impl PumpHandle {
    pub(crate) fn new(
        name: String,
        task: JoinHandle<Result<()>>,
        closed: CancellationToken,
    ) -> Self {
        Self { name, task, closed }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token cancelled once the connection has been closed locally.
    pub fn closed(&self) -> CancellationToken {
        self.closed.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the pump at its next suspension point.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Waits for the pump to finish and returns how it ended.
    pub async fn join(self) -> Result<()> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => {
                log::error!("[{}] pump task did not complete: {}", self.name, e);
                Err(Error::new(ErrorKind::Aborted))
            }
        }
    }
}
