// Type dispatch from the single upstream stat queue to per-category queues.
// Owns every pipeline task handle and the source's shutdown function.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::error::ExporterError;
use crate::models::{DpiStats, Interfaces, StatKind, StatSnapshot, SystemStats};
use crate::source::ShutdownFn;

/// Senders for the three category queues.
#[derive(Clone)]
pub(crate) struct CategorySenders {
    pub(crate) dpi: mpsc::Sender<DpiStats>,
    pub(crate) interfaces: mpsc::Sender<Interfaces>,
    pub(crate) system: mpsc::Sender<SystemStats>,
}

/// Running totals kept by the dispatch task.
#[derive(Debug, Default)]
pub struct DispatchStats {
    dpi: AtomicU64,
    interfaces: AtomicU64,
    system: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time copy of [`DispatchStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchCounts {
    pub dpi: u64,
    pub interfaces: u64,
    pub system: u64,
    /// Snapshots of a kind this build does not route.
    pub dropped: u64,
}

impl DispatchStats {
    fn record(&self, kind: StatKind) {
        let counter = match kind {
            StatKind::Dpi => &self.dpi,
            StatKind::Interfaces => &self.interfaces,
            StatKind::System => &self.system,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn counts(&self) -> DispatchCounts {
        DispatchCounts {
            dpi: self.dpi.load(Ordering::Relaxed),
            interfaces: self.interfaces.load(Ordering::Relaxed),
            system: self.system.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Spawns the dispatch task. It forwards each snapshot, unmodified, to the
/// queue of its category and silently drops kinds it cannot route. Runs
/// until the upstream queue closes; the category queues are left open.
pub(crate) fn spawn_dispatch(
    mut stats_rx: mpsc::Receiver<StatSnapshot>,
    senders: CategorySenders,
    stats: Arc<DispatchStats>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(snapshot) = stats_rx.recv().await {
            let Some(kind) = snapshot.kind() else {
                stats.dropped.fetch_add(1, Ordering::Relaxed);
                continue;
            };
            let delivered = match snapshot {
                StatSnapshot::Dpi(s) => senders.dpi.send(s).await.is_ok(),
                StatSnapshot::Interfaces(s) => senders.interfaces.send(s).await.is_ok(),
                StatSnapshot::System(s) => senders.system.send(s).await.is_ok(),
                StatSnapshot::Unknown => false,
            };
            if delivered {
                stats.record(kind);
            }
        }
        tracing::debug!("Dispatch task shutting down");
    })
}

/// Lifecycle handle for a running pipeline.
///
/// Holds the dispatch and ingest task handles plus a copy of every category
/// sender. Closing the upstream queue ends the dispatch task only; the
/// ingest tasks stay parked on their (still open) queues until this handle
/// is dropped.
pub struct Aggregator {
    done: Option<ShutdownFn>,
    dispatch: Option<JoinHandle<()>>,
    ingest: Vec<JoinHandle<()>>,
    _senders: CategorySenders,
    stats: Arc<DispatchStats>,
}

impl Aggregator {
    pub(crate) fn new(
        done: ShutdownFn,
        dispatch: JoinHandle<()>,
        ingest: Vec<JoinHandle<()>>,
        senders: CategorySenders,
        stats: Arc<DispatchStats>,
    ) -> Self {
        Self {
            done: Some(done),
            dispatch: Some(dispatch),
            ingest,
            _senders: senders,
            stats,
        }
    }

    /// Runs the source's shutdown function. Later calls are no-ops.
    pub fn shutdown(&mut self) -> Result<(), ExporterError> {
        match self.done.take() {
            Some(done) => done().map_err(ExporterError::from),
            None => Ok(()),
        }
    }

    /// Waits up to `grace` for the dispatch task to observe the closed
    /// upstream queue. Returns whether it has finished.
    pub async fn join_dispatch(&mut self, grace: Duration) -> bool {
        let Some(handle) = self.dispatch.as_mut() else {
            return true;
        };
        match tokio::time::timeout(grace, handle).await {
            Ok(result) => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, operation = "join_dispatch", "dispatch task failed");
                }
                self.dispatch = None;
                true
            }
            Err(_) => false,
        }
    }

    pub fn is_dispatch_finished(&self) -> bool {
        self.dispatch.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Number of category ingest tasks still alive.
    pub fn ingest_tasks_running(&self) -> usize {
        self.ingest.iter().filter(|h| !h.is_finished()).count()
    }

    pub fn stats(&self) -> Arc<DispatchStats> {
        self.stats.clone()
    }
}

/// Spawns a task that logs dispatch totals at INFO every `every`.
pub fn spawn_stats_logger(stats: Arc<DispatchStats>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = interval(every);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // First tick completes immediately; nothing has been dispatched yet.
        tick.tick().await;
        loop {
            tick.tick().await;
            let counts = stats.counts();
            tracing::info!(
                dpi_snapshots = counts.dpi,
                interfaces_snapshots = counts.interfaces,
                system_snapshots = counts.system,
                dropped_snapshots = counts.dropped,
                "app stats"
            );
        }
    })
}
