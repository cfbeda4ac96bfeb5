use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch; a clock set before the epoch reads as 0.
pub fn current_unix_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}

/// Returns true when `recorded_ms` lies more than `max_age_ms` before `now_ms`.
///
/// Timestamps from the future are never considered old.
pub fn is_older_than_ms(recorded_ms: u64, now_ms: u64, max_age_ms: u64) -> bool {
    now_ms
        .checked_sub(recorded_ms)
        .is_some_and(|age| age > max_age_ms)
}
