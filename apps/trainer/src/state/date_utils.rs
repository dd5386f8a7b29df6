//! Date utilities for daily reset hour handling.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Timelike};

/// Get the study day for a moment, based on daily_reset_hour.
///
/// If the hour is before the reset hour, the study day is still "yesterday".
/// This lets late-night practice count towards the previous day.
///
/// # Arguments
/// * `now` - The moment to classify
/// * `daily_reset_hour` - Hour of day (0-23) when a new study day begins
pub fn study_day<Tz: TimeZone>(now: &DateTime<Tz>, daily_reset_hour: u32) -> NaiveDate {
    if now.hour() < daily_reset_hour {
        (now.clone() - Duration::days(1)).date_naive()
    } else {
        now.date_naive()
    }
}

/// Study day of the current local time.
pub fn study_today(daily_reset_hour: u32) -> NaiveDate {
    study_day(&Local::now(), daily_reset_hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, hour, 30, 0).unwrap()
    }

    #[test]
    fn test_midnight_reset() {
        // With reset at midnight (0), any hour is the calendar day
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(study_day(&at(0), 0), day);
        assert_eq!(study_day(&at(23), 0), day);
    }

    #[test]
    fn test_before_reset_hour_is_previous_day() {
        let previous = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(study_day(&at(3), 4), previous);
        assert_eq!(study_day(&at(4), 4), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }
}
