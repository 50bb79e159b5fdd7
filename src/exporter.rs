// Composite collector: wires a stat source to the three category
// collectors and serializes concurrent scrapes.

use std::sync::{Arc, Mutex, PoisonError};

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use tokio::sync::mpsc;

use crate::aggregator::{Aggregator, CategorySenders, DispatchStats, spawn_dispatch};
use crate::collectors::{DpiCollector, InterfacesCollector, SystemCollector, spawn_ingest};
use crate::config::MetricsConfig;
use crate::error::ExporterError;
use crate::source::StatSource;

/// Prometheus collector for every device stat category.
///
/// Register it with a `prometheus::Registry`; `collect` may be called from
/// several scrapes at once and is serialized by a single mutex. Ingest
/// tasks do not take this lock, they write straight into the gauges.
pub struct Exporter {
    mu: Mutex<()>,
    dpi: DpiCollector,
    interfaces: InterfacesCollector,
    system: SystemCollector,
}

impl Exporter {
    /// Starts `source` and the pipeline tasks behind it.
    ///
    /// Config and metric definitions are validated before the source is
    /// started, and a source that fails to start leaves nothing running.
    pub fn new(
        source: &mut impl StatSource,
        config: &MetricsConfig,
    ) -> Result<(Exporter, Aggregator), ExporterError> {
        if config.queue_capacity == 0 {
            return Err(ExporterError::InvalidConfig(
                "queue_capacity must be > 0".into(),
            ));
        }
        let dpi = DpiCollector::new(&config.namespace)?;
        let interfaces = InterfacesCollector::new(&config.namespace)?;
        let system = SystemCollector::new(&config.namespace)?;

        let stream = source.start()?;

        let (dpi_tx, dpi_rx) = mpsc::channel(config.queue_capacity);
        let (interfaces_tx, interfaces_rx) = mpsc::channel(config.queue_capacity);
        let (system_tx, system_rx) = mpsc::channel(config.queue_capacity);
        let senders = CategorySenders {
            dpi: dpi_tx,
            interfaces: interfaces_tx,
            system: system_tx,
        };

        let ingest = vec![
            spawn_ingest(dpi.clone(), dpi_rx),
            spawn_ingest(interfaces.clone(), interfaces_rx),
            spawn_ingest(system.clone(), system_rx),
        ];
        let stats = Arc::new(DispatchStats::default());
        let dispatch = spawn_dispatch(stream.stats, senders.clone(), stats.clone());

        tracing::debug!(
            namespace = %config.namespace,
            queue_capacity = config.queue_capacity,
            "Exporter pipeline started"
        );

        let exporter = Exporter {
            mu: Mutex::new(()),
            dpi,
            interfaces,
            system,
        };
        let aggregator = Aggregator::new(stream.done, dispatch, ingest, senders, stats);
        Ok((exporter, aggregator))
    }

    pub fn dpi(&self) -> &DpiCollector {
        &self.dpi
    }

    pub fn interfaces(&self) -> &InterfacesCollector {
        &self.interfaces
    }

    pub fn system(&self) -> &SystemCollector {
        &self.system
    }

    fn collectors(&self) -> [&dyn Collector; 3] {
        [&self.dpi, &self.interfaces, &self.system]
    }
}

impl Collector for Exporter {
    fn desc(&self) -> Vec<&Desc> {
        self.collectors()
            .into_iter()
            .flat_map(|c| c.desc())
            .collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        // The lock guards no data, so a poisoned lock is safe to reuse.
        let _guard = self.mu.lock().unwrap_or_else(PoisonError::into_inner);
        self.collectors()
            .into_iter()
            .flat_map(|c| c.collect())
            .collect()
    }
}
