// Heterogeneous stat snapshot pushed by a source

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DpiStats, Interfaces, SystemStats};

/// One immutable batch of statistics from the device.
///
/// On the wire a snapshot is adjacently tagged:
/// `{"type": "dpi", "data": [...]}`. Any tag this build does not know
/// decodes to [`StatSnapshot::Unknown`] instead of failing, so newer
/// devices can push stat kinds we simply ignore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "lowercase",
    try_from = "RawSnapshot"
)]
pub enum StatSnapshot {
    Dpi(DpiStats),
    Interfaces(Interfaces),
    System(SystemStats),
    Unknown,
}

/// Category a snapshot is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    Dpi,
    Interfaces,
    System,
}

impl StatKind {
    /// Metric subsystem name for this category.
    pub fn subsystem(self) -> &'static str {
        match self {
            StatKind::Dpi => "dpi",
            StatKind::Interfaces => "interfaces",
            StatKind::System => "system",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subsystem())
    }
}

impl StatSnapshot {
    /// `None` for snapshots of a kind this build cannot route.
    pub fn kind(&self) -> Option<StatKind> {
        match self {
            StatSnapshot::Dpi(_) => Some(StatKind::Dpi),
            StatSnapshot::Interfaces(_) => Some(StatKind::Interfaces),
            StatSnapshot::System(_) => Some(StatKind::System),
            StatSnapshot::Unknown => None,
        }
    }
}

/// Untyped wire form; the payload is decoded once the tag is known.
#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl TryFrom<RawSnapshot> for StatSnapshot {
    type Error = serde_json::Error;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        Ok(match raw.kind.to_lowercase().as_str() {
            "dpi" => StatSnapshot::Dpi(serde_json::from_value(raw.data)?),
            "interfaces" => StatSnapshot::Interfaces(serde_json::from_value(raw.data)?),
            "system" => StatSnapshot::System(serde_json::from_value(raw.data)?),
            _ => StatSnapshot::Unknown,
        })
    }
}
