// Shared test helpers

#![allow(dead_code)]

use edgemax_exporter::models::*;
use prometheus::core::Collector;
use prometheus::proto::MetricFamily;
use std::time::Duration;

pub fn dpi_stat(ip: &str, category: &str, type_: &str, rx: u64, tx: u64) -> DpiStat {
    DpiStat {
        client_ip: ip.parse().unwrap(),
        category: category.into(),
        type_: type_.into(),
        receive_bytes: rx,
        transmit_bytes: tx,
    }
}

pub fn interface_stat(name: &str, mac: &str, rx: u64, tx: u64) -> InterfaceStat {
    InterfaceStat {
        name: name.into(),
        mac_address: mac.into(),
        receive_bytes: rx,
        transmit_bytes: tx,
    }
}

pub fn system_stats(cpu: f64, uptime: Duration, memory: f64) -> SystemStats {
    SystemStats {
        cpu_percent: cpu,
        uptime,
        memory_percent: memory,
    }
}

/// Value of the series in family `name` whose label set is exactly `labels`.
pub fn gauge_value(families: &[MetricFamily], name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    families
        .iter()
        .filter(|f| f.get_name() == name)
        .flat_map(|f| f.get_metric())
        .find(|m| {
            let pairs = m.get_label();
            pairs.len() == labels.len()
                && labels.iter().all(|(k, v)| {
                    pairs
                        .iter()
                        .any(|p| p.get_name() == *k && p.get_value() == *v)
                })
        })
        .map(|m| m.get_gauge().get_value())
}

/// Number of series currently present in family `name`.
pub fn series_count(families: &[MetricFamily], name: &str) -> usize {
    families
        .iter()
        .filter(|f| f.get_name() == name)
        .map(|f| f.get_metric().len())
        .sum()
}

/// Total number of series across every family.
pub fn total_series(families: &[MetricFamily]) -> usize {
    families.iter().map(|f| f.get_metric().len()).sum()
}

/// Polls `collector` until `pred` holds for its output, for up to two seconds.
pub async fn wait_for<C, F>(collector: &C, pred: F) -> bool
where
    C: Collector + ?Sized,
    F: Fn(&[MetricFamily]) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        if pred(&collector.collect()) {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
