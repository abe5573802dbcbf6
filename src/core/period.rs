use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A `[start, end)` date interval covered by one cost query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    /// Exclusive: the day after the last billed day.
    pub end: NaiveDate,
}

impl BillingPeriod {
    /// Last day actually included in the period.
    pub fn last_day(&self) -> NaiveDate {
        self.end - Duration::days(1)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Month-to-date period ending (exclusively) at `today`.
///
/// Cost Explorer rejects `start == end`, so on the 1st of a month the period
/// covers the whole previous month instead.
pub fn resolve(today: NaiveDate) -> BillingPeriod {
    let start = first_of_month(today);
    if start == today {
        let previous = first_of_month(start - Duration::days(1));
        return BillingPeriod {
            start: previous,
            end: today,
        };
    }
    BillingPeriod { start, end: today }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn mid_month_covers_month_to_date() {
        let period = resolve(date(2023, 6, 15));
        assert_eq!(period.start, date(2023, 6, 1));
        assert_eq!(period.end, date(2023, 6, 15));
        assert_eq!(period.last_day(), date(2023, 6, 14));
    }

    #[test]
    fn second_of_month_covers_single_day() {
        let period = resolve(date(2023, 6, 2));
        assert_eq!(period.start, date(2023, 6, 1));
        assert_eq!(period.end, date(2023, 6, 2));
        assert_eq!(period.last_day(), period.start);
    }

    #[test]
    fn first_of_month_covers_previous_month() {
        let period = resolve(date(2023, 6, 1));
        assert_eq!(period.start, date(2023, 5, 1));
        assert_eq!(period.end, date(2023, 6, 1));
        assert_eq!(period.last_day(), date(2023, 5, 31));
    }

    #[test]
    fn first_of_january_rolls_back_a_year() {
        let period = resolve(date(2024, 1, 1));
        assert_eq!(period.start, date(2023, 12, 1));
        assert_eq!(period.end, date(2024, 1, 1));
    }

    #[test]
    fn first_of_march_handles_leap_february() {
        let period = resolve(date(2024, 3, 1));
        assert_eq!(period.start, date(2024, 2, 1));
        assert_eq!(period.last_day(), date(2024, 2, 29));
    }

    #[test]
    fn start_is_always_before_end() {
        let mut day = date(2023, 1, 1);
        while day < date(2025, 1, 1) {
            let period = resolve(day);
            assert!(period.start < period.end, "bad period for {day}");
            assert_eq!(period.end, day);
            if day.day() == 1 {
                assert_eq!(period.start, first_of_month(day - Duration::days(1)));
            } else {
                assert_eq!(period.start, first_of_month(day));
            }
            day += Duration::days(1);
        }
    }

    #[test]
    fn period_serializes_as_iso_dates() {
        let period = resolve(date(2023, 6, 15));
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, r#"{"start":"2023-06-01","end":"2023-06-15"}"#);
    }
}
