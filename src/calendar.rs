//! Calendar arithmetic used by the schedules
//!
//! All helpers are pure and operate on `NaiveDate`: calendar days only, no
//! bank-day or holiday adjustments.

use chrono::{Datelike, Months, NaiveDate};

/// Add `months` calendar months, clamping to the last day of shorter months
/// (Jan 31 + 1 month = Feb 28/29, never Mar 2/3)
pub fn add_calendar_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    match date.month() {
        2 if is_leap_year(date.year()) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Same calendar year and month
pub fn is_same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Whole calendar months from `from` to `to`, ignoring the day of month.
/// Negative when `to` lies in an earlier month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

/// Literal calendar-day gap between two dates
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Move `date` to `day` within the same month, clamped to the month's last day
pub fn anchor_to_day(date: NaiveDate, day: u32) -> NaiveDate {
    let day = day.clamp(1, days_in_month(date));
    date.with_day(day).unwrap_or(date)
}
