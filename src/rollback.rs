//! "Date minus N days" computed four ways.
//!
//! The hand-written variants are only correct when the subtraction crosses at
//! most one month boundary. [`date_before`] enforces that with
//! [`MAX_GUARDED_DAYS`]; the other two accept any offset and return garbage
//! for larger ones.

use chrono::{Days, NaiveDate};

use crate::calendar::{last_day_of_month, CalendarDate};
use crate::error::DateError;

/// Largest offset the guarded variant accepts. February can be 28 days long.
pub const MAX_GUARDED_DAYS: i32 = 28;

/// Baseline: let chrono do the arithmetic.
pub fn chrono_date_before(date: NaiveDate, days_before: u64) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(days_before))
}

pub fn date_before_as_record(day: i32, month: i32, year: i32, days_before: i32) -> CalendarDate {
    let diff = day - days_before;
    if diff > 0 {
        return CalendarDate::new(diff, month, year);
    }

    let mut prev_month = month - 1;
    let mut prev_year = year;
    if prev_month == 0 {
        prev_month = 12;
        prev_year -= 1;
    }
    // diff <= 0 here
    let prev_day = last_day_of_month(prev_month, prev_year) + diff;

    CalendarDate::new(prev_day, prev_month, prev_year)
}

/// Array-returning rollback that refuses offsets above [`MAX_GUARDED_DAYS`].
pub fn date_before(day: i32, month: i32, year: i32, days_before: i32) -> Result<[i32; 3], DateError> {
    if days_before > MAX_GUARDED_DAYS {
        return Err(DateError::OffsetTooLarge {
            days_before,
            max: MAX_GUARDED_DAYS,
        });
    }

    let diff = day - days_before;
    if diff > 0 {
        return Ok([diff, month, year]);
    }

    let mut prev_month = month - 1;
    let mut prev_year = year;
    if prev_month == 0 {
        prev_month = 12;
        prev_year -= 1;
    }
    let prev_day = last_day_of_month(prev_month, prev_year) + diff;

    Ok([prev_day, prev_month, prev_year])
}

/// Unguarded array rollback with the January wrap folded into arithmetic.
pub fn date_before_no_if(day: i32, month: i32, year: i32, days_before: i32) -> [i32; 3] {
    let diff = day - days_before;
    if diff > 0 {
        return [diff, month, year];
    }

    let wraps = i32::from(month == 1);
    let prev_month = month - 1 + 12 * wraps;
    let prev_year = year - wraps;
    let prev_day = last_day_of_month(prev_month, prev_year) + diff;

    [prev_day, prev_month, prev_year]
}
