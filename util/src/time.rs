#[cfg(feature = "mock_time")]
use chrono::TimeZone;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use mock_instant::MockClock;

#[cfg(feature = "mock_time")]
pub fn now() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(MockClock::time().as_millis() as i64)
        .earliest()
        .unwrap_or_else(Utc::now)
}

#[cfg(not(feature = "mock_time"))]
pub fn now() -> DateTime<Utc> { Utc::now() }

/// Wall clock time in the system time zone, without offset
pub fn now_local() -> NaiveDateTime { to_local(now()) }

/// Converts an instant in any time zone to a naive date time in the system time zone
pub fn to_local<Tz: chrono::TimeZone>(t: DateTime<Tz>) -> NaiveDateTime { t.with_timezone(&Local).naive_local() }

/// Moves the mock clock, only effective with the `mock_time` feature
pub fn set_current_time(t: DateTime<Utc>) {
    let d = std::time::Duration::from_millis(t.timestamp_millis().max(0) as u64);
    MockClock::set_time(d);
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn to_local_keeps_the_instant() {
        let t = Utc.with_ymd_and_hms(2021, 3, 14, 15, 9, 26).unwrap();
        let local = to_local(t);
        assert_eq!(Local.from_local_datetime(&local).earliest().map(|l| l.with_timezone(&Utc)), Some(t));
    }

    #[cfg(feature = "mock_time")]
    #[test]
    fn mock_clock_drives_now() {
        let t = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        set_current_time(t);
        assert_eq!(now(), t);
        assert_eq!(now_local(), to_local(t));
    }
}
