// Deep packet inspection models

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Byte counters for one (client, category, type) triple as reported by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DpiStat {
    pub client_ip: IpAddr,
    pub category: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub receive_bytes: u64,
    pub transmit_bytes: u64,
}

/// One DPI snapshot: every record the device reported in a single push.
pub type DpiStats = Vec<DpiStat>;
