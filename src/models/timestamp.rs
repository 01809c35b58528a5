//! Millisecond-precision instants
//!
//! Entities serialise their timestamps as epoch milliseconds, so every
//! instant created here is truncated to the millisecond to survive a
//! round-trip unchanged.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// Current instant truncated to milliseconds
pub fn now() -> DateTime<Utc> {
    from_millis(Utc::now().timestamp_millis())
}

/// Instant from epoch milliseconds, clamped to the epoch when out of range
pub fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}

/// UTC midnight at the start of `date`
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// `date` at `hour:minute` UTC, falling back to midnight for an invalid time
pub fn at(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&date.and_time(time))
}

/// UTC calendar day of an instant
pub fn day_of(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_millisecond_precise() {
        let t = now();
        assert_eq!(t.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_start_of_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(start_of_day(date).timestamp_millis(), 1_705_276_800_000);
        assert_eq!(day_of(at(date, 23, 59)), date);
    }
}
