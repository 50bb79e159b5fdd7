// Per-category collectors: one ingest task each, gauges read on scrape

mod dpi;
mod interfaces;
mod system;

pub use dpi::DpiCollector;
pub use interfaces::InterfacesCollector;
pub use system::SystemCollector;

use prometheus::core::Collector;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::StatKind;

/// A collector that owns the gauges for one stat category and applies
/// snapshots of that category to them.
///
/// Gauge handles are shared clones, so the copy moved into the ingest
/// task writes the same series the registered copy reads on scrape.
pub trait Ingest: Collector + Clone + 'static {
    type Snapshot: Send + 'static;

    const KIND: StatKind;

    /// Overwrites the gauges for every record in `snapshot`.
    fn observe(&self, snapshot: &Self::Snapshot);
}

/// Spawns the ingest task for `collector`. Snapshots are applied in the
/// order they were queued; the task exits once every sender is dropped.
pub fn spawn_ingest<C: Ingest>(collector: C, mut rx: mpsc::Receiver<C::Snapshot>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(snapshot) = rx.recv().await {
            collector.observe(&snapshot);
        }
        tracing::debug!(category = %C::KIND, "Ingest task shutting down");
    })
}
