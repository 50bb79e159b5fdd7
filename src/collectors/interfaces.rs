// Per-interface byte counters, labelled by interface name and MAC

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{GaugeVec, Opts};

use super::Ingest;
use crate::models::{Interfaces, StatKind};

const INTERFACE_LABELS: [&str; 2] = ["name", "mac"];

#[derive(Clone)]
pub struct InterfacesCollector {
    received_bytes: GaugeVec,
    transmitted_bytes: GaugeVec,
}

impl InterfacesCollector {
    pub fn new(namespace: &str) -> prometheus::Result<Self> {
        let subsystem = StatKind::Interfaces.subsystem();
        let received_bytes = GaugeVec::new(
            Opts::new(
                "received_bytes",
                "Number of bytes received by interfaces, partitioned by network interface",
            )
            .namespace(namespace)
            .subsystem(subsystem),
            &INTERFACE_LABELS,
        )?;
        let transmitted_bytes = GaugeVec::new(
            Opts::new(
                "transmitted_bytes",
                "Number of bytes transmitted by interfaces, partitioned by network interface",
            )
            .namespace(namespace)
            .subsystem(subsystem),
            &INTERFACE_LABELS,
        )?;
        Ok(Self {
            received_bytes,
            transmitted_bytes,
        })
    }
}

impl Ingest for InterfacesCollector {
    type Snapshot = Interfaces;

    const KIND: StatKind = StatKind::Interfaces;

    fn observe(&self, snapshot: &Interfaces) {
        for ifi in snapshot {
            let mac = ifi.canonical_mac();
            let labels = [ifi.name.as_str(), mac.as_str()];
            self.received_bytes
                .with_label_values(&labels)
                .set(ifi.receive_bytes as f64);
            self.transmitted_bytes
                .with_label_values(&labels)
                .set(ifi.transmit_bytes as f64);
        }
    }
}

impl Collector for InterfacesCollector {
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
