// In-process source fed through an mpsc sender

use tokio::sync::{mpsc, oneshot};

use super::{SourceError, StatSource, StatStream};
use crate::models::StatSnapshot;

/// Source whose snapshots are pushed by the embedding program.
///
/// The upstream queue closes when every producer handle is dropped or when
/// the returned shutdown function runs, whichever comes first.
pub struct ChannelSource {
    feed: Option<mpsc::Receiver<StatSnapshot>>,
    capacity: usize,
}

impl ChannelSource {
    /// Returns the source and the sender used to push snapshots into it.
    pub fn new(capacity: usize) -> Result<(Self, mpsc::Sender<StatSnapshot>), SourceError> {
        if capacity == 0 {
            return Err(SourceError::ZeroCapacity);
        }
        let (tx, rx) = mpsc::channel(capacity);
        Ok((
            Self {
                feed: Some(rx),
                capacity,
            },
            tx,
        ))
    }
}

impl StatSource for ChannelSource {
    fn start(&mut self) -> Result<StatStream, SourceError> {
        let mut feed = self.feed.take().ok_or(SourceError::AlreadyStarted)?;
        let (tx, rx) = mpsc::channel(self.capacity);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    next = feed.recv() => match next {
                        Some(snapshot) => {
                            if tx.send(snapshot).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                    _ = &mut shutdown_rx => break,
                }
            }
            tracing::debug!("Channel source shutting down");
        });

        Ok(StatStream::new(rx, move || {
            let _ = shutdown_tx.send(());
            Ok(())
        }))
    }
}
