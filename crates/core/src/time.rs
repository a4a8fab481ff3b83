use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in whole seconds since the unix epoch.
pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs() as i64)
}
