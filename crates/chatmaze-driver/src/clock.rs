use std::time::{SystemTime, UNIX_EPOCH};

use chatmaze_core::time::Timestamp;

/// Wall-clock milliseconds since the Unix epoch. Only the driver reads the
/// clock; the simulation is always handed `now`.
pub fn now_ms() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
