//! Due-date projection
//!
//! Projects a monthly day-of-month onto the calendar relative to a reference
//! date. A due day that is still ahead this month (or is today) stays in this
//! month; one that has passed rolls into the next month.
//!
//! Days past the end of a month are clamped to the month's last day: a bill
//! on the 31st falls on April 30 and on February 28/29.

use chrono::{Datelike, NaiveDate};

/// Next date on or after `reference` that falls on `target_day`
///
/// `target_day` is clamped to 1..=31 and then to the length of the month it
/// lands in.
pub fn next_due_date(reference: NaiveDate, target_day: u32) -> NaiveDate {
    let day = target_day.clamp(1, 31);

    if let Some(candidate) =
        clamped_date(reference.year(), reference.month(), day).filter(|c| *c >= reference)
    {
        return candidate;
    }

    let (year, month) = next_month(reference.year(), reference.month());
    // Only unreachable at the very end of chrono's supported range
    clamped_date(year, month, day).unwrap_or(reference)
}

/// Whole calendar days from `reference` until `target_day` comes around
///
/// Zero when the due day is today; never negative.
pub fn days_until(reference: NaiveDate, target_day: u32) -> u32 {
    let due = next_due_date(reference, target_day);
    (due - reference).num_days().max(0) as u32
}

/// Number of days in a month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
}
