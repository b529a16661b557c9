use std::hint::black_box;

use chrono::NaiveDate;

use crate::{
    calendar::CalendarDate,
    error::DateError,
    rollback::{chrono_date_before, date_before, date_before_as_record, date_before_no_if},
};

use super::Variant;

fn invalid(date: &CalendarDate) -> DateError {
    DateError::InvalidDate {
        day: date.day,
        month: date.month,
        year: date.year,
    }
}

/// Builds a `NaiveDate` and subtracts through chrono, as a caller would.
fn chrono_minus(day: i32, month: i32, year: i32, days_before: i32) -> Option<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)?;
    chrono_date_before(start, u64::try_from(days_before).ok()?)
}

pub struct ChronoVariant;

impl Variant for ChronoVariant {
    fn name(&self) -> &str {
        "chrono"
    }

    fn run_batch(&self, date: &CalendarDate, days_before: i32, calls: u32) {
        for _ in 0..calls {
            black_box(chrono_minus(
                black_box(date.day),
                black_box(date.month),
                black_box(date.year),
                black_box(days_before),
            ));
        }
    }

    fn compute(&self, date: &CalendarDate, days_before: i32) -> Result<CalendarDate, DateError> {
        chrono_minus(date.day, date.month, date.year, days_before)
            .map(CalendarDate::from_naive)
            .ok_or_else(|| invalid(date))
    }
}

pub struct RecordVariant;

impl Variant for RecordVariant {
    fn name(&self) -> &str {
        "record"
    }

    fn run_batch(&self, date: &CalendarDate, days_before: i32, calls: u32) {
        for _ in 0..calls {
            black_box(date_before_as_record(
                black_box(date.day),
                black_box(date.month),
                black_box(date.year),
                black_box(days_before),
            ));
        }
    }

    fn compute(&self, date: &CalendarDate, days_before: i32) -> Result<CalendarDate, DateError> {
        Ok(date_before_as_record(date.day, date.month, date.year, days_before))
    }
}

pub struct ArrayVariant;

impl Variant for ArrayVariant {
    fn name(&self) -> &str {
        "array"
    }

    fn run_batch(&self, date: &CalendarDate, days_before: i32, calls: u32) {
        for _ in 0..calls {
            // Errors are measured like values; the plan decides the offset.
            let _ = black_box(date_before(
                black_box(date.day),
                black_box(date.month),
                black_box(date.year),
                black_box(days_before),
            ));
        }
    }

    fn compute(&self, date: &CalendarDate, days_before: i32) -> Result<CalendarDate, DateError> {
        date_before(date.day, date.month, date.year, days_before).map(CalendarDate::from_array)
    }
}

pub struct ArrayNoIfVariant;

impl Variant for ArrayNoIfVariant {
    fn name(&self) -> &str {
        "array_no_if"
    }

    fn run_batch(&self, date: &CalendarDate, days_before: i32, calls: u32) {
        for _ in 0..calls {
            black_box(date_before_no_if(
                black_box(date.day),
                black_box(date.month),
                black_box(date.year),
                black_box(days_before),
            ));
        }
    }

    fn compute(&self, date: &CalendarDate, days_before: i32) -> Result<CalendarDate, DateError> {
        Ok(CalendarDate::from_array(date_before_no_if(
            date.day,
            date.month,
            date.year,
            days_before,
        )))
    }
}
