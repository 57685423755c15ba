//! Billing-period keys.
//!
//! A period key identifies one calendar month in UTC, formatted `YYYY-MM`.
//! Keys are lexicographically non-decreasing as time advances, and a new
//! month simply has no entry in the usage record yet, which is what makes
//! the monthly reset automatic, with no reset job or explicit zeroing.

use chrono::{DateTime, Datelike, Utc};

/// Derive the period key for a given instant.
///
/// Pure: two instants in the same UTC calendar month always map to the
/// same key.
pub fn period_key(instant: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", instant.year(), instant.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn month_is_zero_padded() {
        let instant = Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap();
        assert_eq!(period_key(instant), "2026-08");
    }

    #[test]
    fn same_month_same_key() {
        let first = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let last = Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap();
        assert_eq!(period_key(first), period_key(last));
    }

    #[test]
    fn month_rollover_changes_key() {
        let before = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(period_key(before), "2026-12");
        assert_eq!(period_key(after), "2027-01");
    }

    #[test]
    fn keys_order_lexicographically_with_time() {
        let a = period_key(Utc.with_ymd_and_hms(2026, 9, 15, 0, 0, 0).unwrap());
        let b = period_key(Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap());
        let c = period_key(Utc.with_ymd_and_hms(2027, 2, 15, 0, 0, 0).unwrap());
        assert!(a < b);
        assert!(b < c);
    }
}
