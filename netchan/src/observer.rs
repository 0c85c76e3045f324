//! Per-block diagnostics hook.
//!
//! Pumps report every block they move to an [`Observer`]. The default
//! observer does nothing; [`LogObserver`] prints block contents through `log`.

/// Receives a callback for every block a pump moves.
pub trait Observer: Send + Sync {
    /// A block was fully written to the connection.
    fn on_block_sent(&self, _name: &str, _block: &[u8]) {}

    /// A block was read from the connection.
    fn on_block_received(&self, _name: &str, _block: &[u8]) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Logs each block at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_block_sent(&self, name: &str, block: &[u8]) {
        log::debug!("[{}] sent block {:?}", name, String::from_utf8_lossy(block));
    }

    fn on_block_received(&self, name: &str, block: &[u8]) {
        log::debug!("[{}] got block {:?}", name, String::from_utf8_lossy(block));
    }
}
