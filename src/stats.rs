use crate::models::CountdownResponse;
use chrono::{Local, NaiveDate, TimeZone};
use serde::Serialize;

/// How old a weak area has been allowed to get.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeakStatus {
    Fresh,
    Warning,
    Critical,
}

/// How much of the week is left to clear the weak areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStatus {
    Safe,
    Warning,
    Critical,
    Over,
}

pub fn classify_weak_age(age_days: i64) -> WeakStatus {
    if age_days >= 5 {
        WeakStatus::Critical
    } else if age_days >= 3 {
        WeakStatus::Warning
    } else {
        WeakStatus::Fresh
    }
}

pub fn classify_week(remaining: i64) -> WeekStatus {
    match remaining {
        r if r >= 5 => WeekStatus::Safe,
        3..=4 => WeekStatus::Warning,
        1..=2 => WeekStatus::Critical,
        _ => WeekStatus::Over,
    }
}

/// Whole days since a stored `YYYY-MM-DD` key. An unparseable key counts as
/// written today, so it classifies as fresh instead of failing the render.
pub fn days_since(today: NaiveDate, date_key: &str) -> i64 {
    match date_key.parse::<NaiveDate>() {
        Ok(added) => (today - added).num_days(),
        Err(_) => 0,
    }
}

pub fn days_passed_in_week(today: NaiveDate, week_start_ms: i64) -> i64 {
    let start = Local
        .timestamp_millis_opt(week_start_ms)
        .single()
        .map(|dt| dt.date_naive())
        .unwrap_or(today);
    (today - start).num_days()
}

pub fn mock_is_stale(today: NaiveDate, last_mock_date: &str) -> bool {
    days_since(today, last_mock_date) >= 7
}

fn exam_window() -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(2026, 2, 1).expect("fixed calendar date");
    let end = NaiveDate::from_ymd_opt(2028, 2, 10).expect("fixed calendar date");
    (start, end)
}

pub fn exam_countdown(today: NaiveDate) -> CountdownResponse {
    let (start, end) = exam_window();
    let total_days = (end - start).num_days();
    let passed_days = (today - start).num_days().clamp(0, total_days);
    let progress_percent =
        ((passed_days * 100) as f64 / total_days as f64).round() as i64;

    CountdownResponse {
        start_date: start.to_string(),
        end_date: end.to_string(),
        total_days,
        passed_days,
        days_left: total_days - passed_days,
        progress_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weak_age_thresholds() {
        let today = date(2026, 8, 27);
        let key = |days: i64| period::date_key(today - Duration::days(days));

        assert_eq!(classify_weak_age(days_since(today, &key(1))), WeakStatus::Fresh);
        assert_eq!(classify_weak_age(days_since(today, &key(3))), WeakStatus::Warning);
        assert_eq!(classify_weak_age(days_since(today, &key(4))), WeakStatus::Warning);
        assert_eq!(classify_weak_age(days_since(today, &key(5))), WeakStatus::Critical);
    }

    #[test]
    fn unparseable_added_on_counts_as_fresh() {
        assert_eq!(days_since(date(2026, 8, 27), "not a date"), 0);
    }

    #[test]
    fn week_countdown_statuses() {
        assert_eq!(classify_week(7), WeekStatus::Safe);
        assert_eq!(classify_week(5), WeekStatus::Safe);
        assert_eq!(classify_week(4), WeekStatus::Warning);
        assert_eq!(classify_week(3), WeekStatus::Warning);
        assert_eq!(classify_week(2), WeekStatus::Critical);
        assert_eq!(classify_week(1), WeekStatus::Critical);
        assert_eq!(classify_week(0), WeekStatus::Over);
        assert_eq!(classify_week(-2), WeekStatus::Over);
    }

    #[test]
    fn sixth_day_of_week_is_the_last_day() {
        // weekStart = this past Sunday, today = weekStart + 6 days.
        let sunday = date(2026, 8, 23);
        let today = sunday + Duration::days(6);
        let passed = days_passed_in_week(today, period::week_start_millis(sunday));
        assert_eq!(passed, 6);
        assert_eq!(classify_week(7 - passed), WeekStatus::Critical);
    }

    #[test]
    fn mock_staleness_boundary() {
        let today = date(2026, 8, 27);
        let key = |days: i64| period::date_key(today - Duration::days(days));
        assert!(!mock_is_stale(today, &key(6)));
        assert!(mock_is_stale(today, &key(7)));
    }

    #[test]
    fn countdown_clamps_before_start() {
        let countdown = exam_countdown(date(2026, 1, 15));
        assert_eq!(countdown.passed_days, 0);
        assert_eq!(countdown.progress_percent, 0);
        assert_eq!(countdown.days_left, countdown.total_days);
    }

    #[test]
    fn countdown_clamps_after_end() {
        let countdown = exam_countdown(date(2028, 3, 1));
        assert_eq!(countdown.passed_days, countdown.total_days);
        assert_eq!(countdown.progress_percent, 100);
        assert_eq!(countdown.days_left, 0);
    }

    #[test]
    fn countdown_total_spans_the_whole_window() {
        let countdown = exam_countdown(date(2026, 8, 27));
        assert_eq!(countdown.total_days, 739);
        assert!((0..=100).contains(&countdown.progress_percent));
        assert_eq!(
            countdown.passed_days + countdown.days_left,
            countdown.total_days
        );
    }
}
