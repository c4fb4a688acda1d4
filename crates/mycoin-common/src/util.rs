//! Util

use web_time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since unix epoch
pub fn unix_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
