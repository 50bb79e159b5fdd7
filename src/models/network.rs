// Network interface models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceStat {
    pub name: String,
    pub mac_address: String,
    pub receive_bytes: u64,
    pub transmit_bytes: u64,
}

impl InterfaceStat {
    /// MAC address in canonical form: lowercase hex, colon separated.
    pub fn canonical_mac(&self) -> String {
        self.mac_address
            .trim()
            .chars()
            .map(|c| if c == '-' { ':' } else { c.to_ascii_lowercase() })
            .collect()
    }
}

/// One interfaces snapshot, in device order.
pub type Interfaces = Vec<InterfaceStat>;
