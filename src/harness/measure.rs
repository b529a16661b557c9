//! Average-time measurement: run batches until a time budget elapses.

use std::time::{Duration, Instant};

use crate::calendar::CalendarDate;

use super::Variant;

/// One timed iteration of a single variant.
#[derive(Debug, Clone, Copy)]
pub struct IterationSample {
    pub operations: u64,
    pub elapsed: Duration,
}

impl IterationSample {
    pub fn avg_ns(&self) -> f64 {
        if self.operations == 0 {
            return 0.0;
        }
        self.elapsed.as_nanos() as f64 / self.operations as f64
    }
}

/// Runs at least one batch, then keeps going until `budget` has elapsed.
pub fn run_iteration(
    variant: &dyn Variant,
    date: &CalendarDate,
    days_before: i32,
    budget: Duration,
    batch_size: u32,
) -> IterationSample {
    let start = Instant::now();
    let mut operations = 0u64;
    loop {
        variant.run_batch(date, days_before, batch_size);
        operations += u64::from(batch_size);
        let elapsed = start.elapsed();
        if elapsed >= budget {
            return IterationSample { operations, elapsed };
        }
    }
}

/// Mean, sample standard deviation and range of per-iteration averages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let count = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / count;
        let std_dev = if samples.len() < 2 {
            0.0
        } else {
            let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (count - 1.0);
            variance.sqrt()
        };
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self { mean, std_dev, min, max })
    }
}
