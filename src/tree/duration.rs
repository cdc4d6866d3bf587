use chrono::{Datelike, NaiveDate, Weekday};

/// Weekdays in `[start, end]`, both ends inclusive. Saturdays and Sundays
/// are excluded; holidays are not considered.
///
/// A missing date yields 1. An inverted range yields 0.
pub fn business_days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> i64 {
    let (Some(start), Some(end)) = (start, end) else {
        return 1;
    };
    if end < start {
        return 0;
    }

    let span = (end - start).num_days() + 1;
    let full_weeks = span / 7;
    let mut count = full_weeks * 5;

    let mut day = start.weekday();
    for _ in 0..span % 7 {
        if !is_weekend(day) {
            count += 1;
        }
        day = day.succ();
    }
    count
}

pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, day)
    }

    #[test]
    fn test_monday_to_friday_is_five() {
        assert_eq!(business_days(d(2024, 1, 1), d(2024, 1, 5)), 5);
    }

    #[test]
    fn test_friday_to_monday_is_two() {
        assert_eq!(business_days(d(2024, 1, 5), d(2024, 1, 8)), 2);
    }

    #[test]
    fn test_full_weekend_subtracts_two() {
        // Wed 3rd .. Tue 9th: 7 calendar days, one weekend.
        assert_eq!(business_days(d(2024, 1, 3), d(2024, 1, 9)), 5);
        // Mon 1st .. Fri 12th: 12 calendar days.
        assert_eq!(business_days(d(2024, 1, 1), d(2024, 1, 12)), 10);
    }

    #[test]
    fn test_same_day() {
        assert_eq!(business_days(d(2024, 1, 3), d(2024, 1, 3)), 1);
        assert_eq!(business_days(d(2024, 1, 6), d(2024, 1, 6)), 0);
    }

    #[test]
    fn test_missing_dates_default_to_one() {
        assert_eq!(business_days(None, d(2024, 1, 5)), 1);
        assert_eq!(business_days(d(2024, 1, 5), None), 1);
        assert_eq!(business_days(None, None), 1);
    }

    #[test]
    fn test_inverted_range_is_zero() {
        assert_eq!(business_days(d(2024, 1, 9), d(2024, 1, 1)), 0);
    }

    #[test]
    fn test_matches_day_by_day_count() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        for len in 0..60 {
            let end = start + chrono::Duration::days(len);
            let naive = start
                .iter_days()
                .take_while(|x| *x <= end)
                .filter(|x| !is_weekend(x.weekday()))
                .count() as i64;
            assert_eq!(business_days(Some(start), Some(end)), naive, "len {len}");
        }
    }
}
