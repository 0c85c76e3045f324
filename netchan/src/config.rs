use std::fmt;
use std::sync::Arc;

use crate::observer::{LogObserver, NoopObserver, Observer};

/// Size of the buffer the reader pump reads into.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 256;

/// Capacity of every channel a pump creates.
///
/// One is the smallest bound tokio channels accept and the closest match to a
/// synchronous hand-off.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1;

pub const DEFAULT_NAME: &str = "conn";

#[derive(Clone)]
pub struct PumpConfig {
    pub read_buffer_size: usize,
    pub channel_capacity: usize,
    pub name: String,
    pub observer: Arc<dyn Observer>,
}

impl PumpConfig {
    pub fn new() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            name: DEFAULT_NAME.to_string(),
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Label used in log lines and observer callbacks.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    /// Shorthand for installing [`LogObserver`] (or resetting to no-op).
    pub fn with_debug(self, debug: bool) -> Self {
        if debug {
            self.with_observer(Arc::new(LogObserver))
        } else {
            self.with_observer(Arc::new(NoopObserver))
        }
    }
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PumpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PumpConfig")
            .field("read_buffer_size", &self.read_buffer_size)
            .field("channel_capacity", &self.channel_capacity)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
