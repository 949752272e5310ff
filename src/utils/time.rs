/// Milliseconds in one day.
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Current time as milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Oldest `created_at` kept by an archive cleanup run at `now`.
pub fn retention_cutoff(now: i64, retention_days: u32) -> i64 {
    now.saturating_sub(i64::from(retention_days).saturating_mul(MILLIS_PER_DAY))
}

/// Render epoch milliseconds as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map_or_else(|| millis.to_string(), |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retention_cutoff() {
        assert_eq!(retention_cutoff(100 * MILLIS_PER_DAY, 30), 70 * MILLIS_PER_DAY);
        assert_eq!(retention_cutoff(5, 0), 5);
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(0), "1970-01-01 00:00:00");
    }
}
