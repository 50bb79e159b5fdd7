// Newline-delimited JSON feed (stdin, a file, or any async reader)

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::{mpsc, oneshot};

use super::{SourceError, StatSource, StatStream};
use crate::config::SourceConfig;
use crate::models::StatSnapshot;

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

enum Input {
    Stdin,
    File(PathBuf),
    Reader(BoxedReader),
}

/// Reads one JSON `StatSnapshot` per line until EOF or shutdown.
///
/// Blank lines are skipped and undecodable lines are logged and skipped;
/// the upstream queue closes at EOF.
pub struct JsonLinesSource {
    input: Option<Input>,
    capacity: usize,
}

impl JsonLinesSource {
    /// `-` reads stdin; anything else is opened as a file on `start`.
    pub fn from_config(config: &SourceConfig) -> Self {
        let input = if config.path == "-" {
            Input::Stdin
        } else {
            Input::File(PathBuf::from(&config.path))
        };
        Self {
            input: Some(input),
            capacity: config.channel_capacity,
        }
    }

    pub fn from_reader(reader: impl AsyncRead + Send + Unpin + 'static, capacity: usize) -> Self {
        Self {
            input: Some(Input::Reader(Box::new(reader))),
            capacity,
        }
    }
}

impl StatSource for JsonLinesSource {
    fn start(&mut self) -> Result<StatStream, SourceError> {
        if self.capacity == 0 {
            return Err(SourceError::ZeroCapacity);
        }
        let reader: BoxedReader = match self.input.take().ok_or(SourceError::AlreadyStarted)? {
            Input::Stdin => Box::new(tokio::io::stdin()),
            Input::File(path) => {
                let file = std::fs::File::open(&path)?;
                tracing::info!(path = %path.display(), "Reading stat feed");
                Box::new(tokio::fs::File::from_std(file))
            }
            Input::Reader(reader) => reader,
        };

        let (tx, rx) = mpsc::channel(self.capacity);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(read_feed(reader, tx, shutdown_rx));

        Ok(StatStream::new(rx, move || {
            let _ = shutdown_tx.send(());
            Ok(())
        }))
    }
}

async fn read_feed(
    reader: BoxedReader,
    tx: mpsc::Sender<StatSnapshot>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut lines = BufReader::new(reader).lines();
    let mut line_no: u64 = 0;

    loop {
        tokio::select! {
            next = lines.next_line() => {
                let line = match next {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        tracing::debug!(lines = line_no, "Stat feed reached EOF");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, operation = "read_feed", "stat feed read failed");
                        break;
                    }
                };
                line_no += 1;
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<StatSnapshot>(line) {
                    Ok(snapshot) => {
                        if tx.send(snapshot).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            line = line_no,
                            operation = "decode_snapshot",
                            "skipping undecodable snapshot"
                        );
                    }
                }
            }
            _ = &mut shutdown_rx => break,
        }
    }
    tracing::debug!("Stat feed reader shutting down");
}
