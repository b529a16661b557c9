pub mod calendar;
pub mod config;
pub mod error;
pub mod harness;
pub mod logging;
pub mod report;
pub mod rollback;

pub use calendar::CalendarDate;
pub use config::{BenchPlan, PlanLoader};
pub use error::DateError;
pub use harness::{Harness, HarnessBuilder, Variant};
pub use report::{BenchRecord, BenchReport, ReportWriter};
