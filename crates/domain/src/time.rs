//! Time and timestamp helpers.

use chrono::{DateTime, Timelike, Utc};

/// UTC timestamp used for reading freshness and schedule decisions.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Seconds elapsed since midnight of `at`'s day, the schedule anchor.
#[must_use]
pub fn seconds_since_midnight(at: Timestamp) -> u32 {
    at.num_seconds_from_midnight()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_count_seconds_from_midnight() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 1, 2, 3).unwrap();
        assert_eq!(seconds_since_midnight(at), 3723);
    }

    #[test]
    fn should_return_zero_at_midnight() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(seconds_since_midnight(at), 0);
    }
}
