// CPU, memory and uptime of the device

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub cpu_percent: f64,
    /// Serialized as whole milliseconds (`uptimeMs`).
    #[serde(rename = "uptimeMs", with = "duration_ms")]
    pub uptime: Duration,
    pub memory_percent: f64,
}

impl SystemStats {
    /// Uptime truncated to whole seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.uptime.as_secs()
    }
}

mod duration_ms {
    use super::*;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
        s.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
