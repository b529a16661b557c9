//! Gregorian calendar primitives shared by every rollback variant.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DateError;

/// A plain day/month/year triple.
///
/// The fields are not validated on construction: the rollback arithmetic
/// trusts its caller. Use [`CalendarDate::is_valid`] or the `FromStr`
/// implementation when the input comes from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    pub day: i32,
    pub month: i32,
    pub year: i32,
}

impl CalendarDate {
    pub const fn new(day: i32, month: i32, year: i32) -> Self {
        Self { day, month, year }
    }

    pub const fn from_array(parts: [i32; 3]) -> Self {
        Self::new(parts[0], parts[1], parts[2])
    }

    pub const fn to_array(self) -> [i32; 3] {
        [self.day, self.month, self.year]
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= last_day_of_month(self.month, self.year)
    }

    pub fn to_naive(self) -> Option<NaiveDate> {
        let day = u32::try_from(self.day).ok()?;
        let month = u32::try_from(self.month).ok()?;
        NaiveDate::from_ymd_opt(self.year, month, day)
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        // day() and month() are at most 31 and 12
        Self::new(date.day() as i32, date.month() as i32, date.year())
    }

    /// The date `days_before` days earlier, crossing at most one month boundary.
    pub fn minus_days(self, days_before: i32) -> Self {
        crate::rollback::date_before_as_record(self.day, self.month, self.year, days_before)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.day, self.month, self.year)
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    /// Parses `D/M/YYYY`, e.g. `5/3/2022`. Leading zeros are accepted.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || DateError::InvalidFormat(text.to_string());
        let mut parts = text.trim().split('/');
        let mut next = || -> Result<i32, DateError> {
            parts
                .next()
                .and_then(|part| part.trim().parse::<i32>().ok())
                .ok_or_else(invalid)
        };
        let date = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        if !date.is_valid() {
            return Err(DateError::InvalidDate {
                day: date.day,
                month: date.month,
                year: date.year,
            });
        }
        Ok(date)
    }
}

/// Divisible by 4, except centuries not divisible by 400.
pub const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub const fn last_day_of_month(month: i32, year: i32) -> i32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}
