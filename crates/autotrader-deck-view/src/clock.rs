/*
[INPUT]:  Current wall-clock time and the scan interval
[OUTPUT]: `m:ss` countdown to the next interval-aligned mark
[POS]:    Schedule layer - pure display helper, re-evaluated once per second
[UPDATE]: When the scan cadence or countdown format changes
*/

use chrono::Timelike;

const MILLIS_PER_MINUTE: u64 = 60_000;

/// Countdown to the next mark aligned to `interval_minutes` past the hour.
///
/// Exactly on a mark yields the full interval (`5:00`). Inside the last second
/// before a mark it yields `0:00`.
pub fn countdown<T: Timelike>(now: &T, interval_minutes: u32) -> String {
    let remaining = remaining_millis(now, interval_minutes) / 1000;
    format!("{}:{:02}", remaining / 60, remaining % 60)
}

/// Milliseconds until the next aligned mark, in `1..=interval`
pub fn remaining_millis<T: Timelike>(now: &T, interval_minutes: u32) -> u64 {
    let interval = u64::from(interval_minutes.max(1)) * MILLIS_PER_MINUTE;
    // leap-second nanos above 1e9 clamp into the last millisecond
    let millis_of_second = u64::from(now.nanosecond().min(999_999_999) / 1_000_000);
    let elapsed = (u64::from(now.num_seconds_from_midnight()) * 1000 + millis_of_second) % interval;
    interval - elapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rstest::rstest;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> NaiveTime {
        NaiveTime::from_hms_milli_opt(h, m, s, ms).expect("valid time")
    }

    #[rstest]
    #[case(at(12, 3, 58, 0), "1:02")]
    #[case(at(12, 5, 0, 0), "5:00")]
    #[case(at(12, 4, 59, 0), "0:01")]
    #[case(at(12, 4, 59, 500), "0:00")]
    #[case(at(0, 0, 0, 0), "5:00")]
    #[case(at(23, 59, 59, 999), "0:00")]
    #[case(at(9, 31, 15, 0), "3:45")]
    fn five_minute_countdown(#[case] now: NaiveTime, #[case] expected: &str) {
        assert_eq!(countdown(&now, 5), expected);
    }

    #[test]
    fn other_intervals_align_the_same_way() {
        assert_eq!(countdown(&at(10, 14, 30, 0), 15), "0:30");
        assert_eq!(countdown(&at(10, 15, 0, 0), 15), "15:00");
    }

    #[test]
    fn zero_interval_is_treated_as_one_minute() {
        assert_eq!(countdown(&at(10, 0, 45, 0), 0), "0:15");
    }
}
