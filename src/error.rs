use thiserror::Error;

/// Errors produced by date parsing and the guarded rollback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("expected a date in D/M/YYYY form, got `{0}`")]
    InvalidFormat(String),
    #[error("{day}/{month}/{year} is not a valid calendar date")]
    InvalidDate { day: i32, month: i32, year: i32 },
    #[error("offset of {days_before} days exceeds the single-month limit of {max}; use chrono for larger offsets")]
    OffsetTooLarge { days_before: i32, max: i32 },
}
