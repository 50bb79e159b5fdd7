// Upstream stat sources: anything that can push StatSnapshots on one queue

mod channel;
mod json_lines;

pub use channel::ChannelSource;
pub use json_lines::JsonLinesSource;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::models::StatSnapshot;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("feed I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stat source already started")]
    AlreadyStarted,

    #[error("stat source channel capacity must be > 0")]
    ZeroCapacity,
}

/// Stops a running source; closing its stat queue is the only signal
/// downstream tasks see.
pub type ShutdownFn = Box<dyn FnOnce() -> Result<(), SourceError> + Send>;

/// A started source: the heterogeneous stat queue plus its shutdown function.
pub struct StatStream {
    pub stats: mpsc::Receiver<StatSnapshot>,
    pub done: ShutdownFn,
}

impl StatStream {
    pub fn new(
        stats: mpsc::Receiver<StatSnapshot>,
        done: impl FnOnce() -> Result<(), SourceError> + Send + 'static,
    ) -> Self {
        Self {
            stats,
            done: Box::new(done),
        }
    }
}

/// Producer of device statistics. Connection handling, polling and retries
/// all live behind `start`.
pub trait StatSource {
    /// Starts producing snapshots. Must be called from within a tokio runtime.
    fn start(&mut self) -> Result<StatStream, SourceError>;
}
