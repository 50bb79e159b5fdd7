// Deep packet inspection byte counters, labelled by client/category/type

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{GaugeVec, Opts};

use super::Ingest;
use crate::models::{DpiStats, StatKind};

const DPI_LABELS: [&str; 3] = ["client_ip", "category", "type"];

#[derive(Clone)]
pub struct DpiCollector {
    received_bytes: GaugeVec,
    transmitted_bytes: GaugeVec,
}

impl DpiCollector {
    pub fn new(namespace: &str) -> prometheus::Result<Self> {
        let subsystem = StatKind::Dpi.subsystem();
        let received_bytes = GaugeVec::new(
            Opts::new(
                "received_bytes",
                "Number of bytes received by devices (client download)",
            )
            .namespace(namespace)
            .subsystem(subsystem),
            &DPI_LABELS,
        )?;
        let transmitted_bytes = GaugeVec::new(
            Opts::new(
                "transmitted_bytes",
                "Number of bytes transmitted by devices (client upload)",
            )
            .namespace(namespace)
            .subsystem(subsystem),
            &DPI_LABELS,
        )?;
        Ok(Self {
            received_bytes,
            transmitted_bytes,
        })
    }
}

impl Ingest for DpiCollector {
    type Snapshot = DpiStats;

    const KIND: StatKind = StatKind::Dpi;

    fn observe(&self, snapshot: &DpiStats) {
        for stat in snapshot {
            let client_ip = stat.client_ip.to_string();
            let labels = [
                client_ip.as_str(),
                stat.category.as_str(),
                stat.type_.as_str(),
            ];
            self.received_bytes
                .with_label_values(&labels)
                .set(stat.receive_bytes as f64);
            self.transmitted_bytes
                .with_label_values(&labels)
                .set(stat.transmit_bytes as f64);
        }
    }
}

impl Collector for DpiCollector {
    fn desc(&self) -> Vec<&Desc> {
        let mut descs = self.received_bytes.desc();
        descs.extend(self.transmitted_bytes.desc());
        descs
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let mut families = self.received_bytes.collect();
        families.extend(self.transmitted_bytes.collect());
        families
    }
}
