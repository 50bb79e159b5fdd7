// Device stat models (feed wire format + in-process snapshot type)

mod dpi;
mod network;
mod snapshot;
mod system;

pub use dpi::{DpiStat, DpiStats};
pub use network::{InterfaceStat, Interfaces};
pub use snapshot::{StatKind, StatSnapshot};
pub use system::SystemStats;
