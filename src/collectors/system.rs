// Unlabelled device gauges: CPU, uptime, memory

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, Opts};

use super::Ingest;
use crate::models::{StatKind, SystemStats};

#[derive(Clone)]
pub struct SystemCollector {
    cpu_percent: Gauge,
    uptime_seconds: Gauge,
    memory_percent: Gauge,
}

impl SystemCollector {
    pub fn new(namespace: &str) -> prometheus::Result<Self> {
        let gauge = |name: &str, help: &str| {
            Gauge::with_opts(
                Opts::new(name, help)
                    .namespace(namespace)
                    .subsystem(StatKind::System.subsystem()),
            )
        };
        Ok(Self {
            cpu_percent: gauge("cpu_percent", "System CPU usage percentage")?,
            uptime_seconds: gauge("uptime_seconds", "System uptime in seconds")?,
            memory_percent: gauge("memory_percent", "System memory usage percentage")?,
        })
    }

    fn gauges(&self) -> [&Gauge; 3] {
        [&self.cpu_percent, &self.uptime_seconds, &self.memory_percent]
    }
}

impl Ingest for SystemCollector {
    type Snapshot = SystemStats;

    const KIND: StatKind = StatKind::System;

    fn observe(&self, snapshot: &SystemStats) {
        self.cpu_percent.set(snapshot.cpu_percent);
        self.uptime_seconds.set(snapshot.uptime_secs() as f64);
        self.memory_percent.set(snapshot.memory_percent);
    }
}

impl Collector for SystemCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.gauges().into_iter().flat_map(|g| g.desc()).collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.gauges().into_iter().flat_map(|g| g.collect()).collect()
    }
}
