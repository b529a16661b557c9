//! Parametrized timing harness.
//!
//! For each plan date, every registered [`Variant`] is warmed up and then
//! measured in average-time mode. A fork is an independent trial with its own
//! warm-up; the first `warmup_forks` trials are run and thrown away. Inside a
//! fork the variant order is shuffled from the plan seed.

pub mod measure;
pub mod order;
pub mod variants;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::{
    calendar::CalendarDate,
    config::{BenchPlan, MeasurementConfig},
    error::DateError,
    report::{BenchRecord, BenchReport},
};

pub use measure::{run_iteration, IterationSample, Summary};
pub use order::RunOrder;
pub use variants::{ArrayNoIfVariant, ArrayVariant, ChronoVariant, RecordVariant};

/// One way of computing "date minus N days".
pub trait Variant {
    fn name(&self) -> &str;

    /// Calls the computation `calls` times, passing inputs and outputs through `black_box`.
    fn run_batch(&self, date: &CalendarDate, days_before: i32, calls: u32);

    /// A single call, normalised to `CalendarDate` for comparison.
    fn compute(&self, date: &CalendarDate, days_before: i32) -> Result<CalendarDate, DateError>;
}

/// A variant whose output disagrees with chrono.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub variant: String,
    pub date: CalendarDate,
    pub days_before: i32,
    pub expected: Result<CalendarDate, DateError>,
    pub actual: Result<CalendarDate, DateError>,
}

pub struct HarnessBuilder {
    measurement: MeasurementConfig,
    seed: u64,
    variants: Vec<Box<dyn Variant>>,
}

impl HarnessBuilder {
    pub fn new(measurement: MeasurementConfig, seed: u64) -> Self {
        Self {
            measurement,
            seed,
            variants: Vec::new(),
        }
    }

    pub fn for_plan(plan: &BenchPlan) -> Self {
        Self::new(plan.measurement.clone(), plan.seed)
    }

    pub fn with_variant(mut self, variant: impl Variant + 'static) -> Self {
        self.variants.push(Box::new(variant));
        self
    }

    pub fn with_builtin_variants(self) -> Self {
        self.with_variant(ChronoVariant)
            .with_variant(RecordVariant)
            .with_variant(ArrayVariant)
            .with_variant(ArrayNoIfVariant)
    }

    pub fn build(self) -> Harness {
        Harness {
            order: RunOrder::new(self.seed),
            measurement: self.measurement,
            variants: self.variants,
        }
    }
}

pub struct Harness {
    order: RunOrder,
    measurement: MeasurementConfig,
    variants: Vec<Box<dyn Variant>>,
}

impl Harness {
    pub fn variant_names(&self) -> Vec<&str> {
        self.variants.iter().map(|variant| variant.name()).collect()
    }

    pub fn run(&mut self, plan: &BenchPlan) -> Result<BenchReport> {
        self.run_with_hook(plan, |_| {})
    }

    /// Measures every (date, variant) pair, calling `hook` as each record completes.
    pub fn run_with_hook<F>(&mut self, plan: &BenchPlan, mut hook: F) -> Result<BenchReport>
    where
        F: FnMut(&BenchRecord),
    {
        let dates = plan.parsed_dates()?;
        let mut report = BenchReport::new(&plan.name, plan.days_before);
        if self.variants.is_empty() {
            warn!(plan = %plan.name, "no variants registered; nothing to measure");
            return Ok(report);
        }

        for date in &dates {
            info!(%date, days_before = plan.days_before, "benchmarking date");
            for record in self.measure_date(date, plan.days_before) {
                hook(&record);
                report.records.push(record);
            }
        }
        Ok(report)
    }

    fn measure_date(&mut self, date: &CalendarDate, days_before: i32) -> Vec<BenchRecord> {
        let settings = &self.measurement;
        let total_forks = settings.warmup_forks.saturating_add(settings.forks);
        let mut samples: Vec<Vec<f64>> = vec![Vec::new(); self.variants.len()];
        let mut operations = vec![0u64; self.variants.len()];

        for fork in 0..total_forks {
            let measured = fork >= settings.warmup_forks;
            for index in self.order.next_order(self.variants.len()) {
                let variant = self.variants[index].as_ref();
                for _ in 0..settings.warmup_iterations {
                    run_iteration(
                        variant,
                        date,
                        days_before,
                        settings.warmup_time(),
                        settings.batch_size,
                    );
                }
                for iteration in 0..settings.measurement_iterations {
                    let sample = run_iteration(
                        variant,
                        date,
                        days_before,
                        settings.measurement_time(),
                        settings.batch_size,
                    );
                    debug!(
                        variant = variant.name(),
                        fork,
                        iteration,
                        measured,
                        avg_ns = sample.avg_ns(),
                        "iteration complete"
                    );
                    if measured {
                        samples[index].push(sample.avg_ns());
                        operations[index] += sample.operations;
                    }
                }
            }
        }

        self.variants
            .iter()
            .zip(samples.iter().zip(operations))
            .filter_map(|(variant, (averages, operations))| {
                let summary = Summary::from_samples(averages)?;
                Some(BenchRecord {
                    variant: variant.name().to_string(),
                    date: date.to_string(),
                    forks: settings.forks,
                    iterations: averages.len() as u32,
                    operations,
                    avg_ns: summary.mean,
                    stddev_ns: summary.std_dev,
                    min_ns: summary.min,
                    max_ns: summary.max,
                })
            })
            .collect()
    }

    /// Compares every registered variant against chrono for each plan date.
    pub fn verify(&self, plan: &BenchPlan) -> Result<Vec<Mismatch>> {
        let dates = plan.parsed_dates()?;
        let mut mismatches = Vec::new();
        for date in &dates {
            let expected = ChronoVariant.compute(date, plan.days_before);
            for variant in &self.variants {
                let actual = variant.compute(date, plan.days_before);
                if actual != expected {
                    warn!(
                        variant = variant.name(),
                        %date,
                        days_before = plan.days_before,
                        ?expected,
                        ?actual,
                        "variant disagrees with chrono"
                    );
                    mismatches.push(Mismatch {
                        variant: variant.name().to_string(),
                        date: *date,
                        days_before: plan.days_before,
                        expected: expected.clone(),
                        actual,
                    });
                }
            }
        }
        Ok(mismatches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_plan() -> BenchPlan {
        let mut plan = BenchPlan::default();
        plan.measurement = MeasurementConfig {
            forks: 2,
            warmup_forks: 1,
            warmup_iterations: 1,
            warmup_time_ms: 0,
            measurement_iterations: 2,
            measurement_time_ms: 0,
            batch_size: 8,
        };
        plan
    }

    struct CountingVariant {
        calls: std::cell::Cell<u64>,
    }

    impl Variant for CountingVariant {
        fn name(&self) -> &str {
            "counting"
        }

        fn run_batch(&self, _date: &CalendarDate, _days_before: i32, calls: u32) {
            self.calls.set(self.calls.get() + u64::from(calls));
        }

        fn compute(&self, date: &CalendarDate, days_before: i32) -> Result<CalendarDate, DateError> {
            Ok(date.minus_days(days_before))
        }
    }

    #[test]
    fn builtin_variant_names() {
        let harness = HarnessBuilder::new(MeasurementConfig::default(), 1)
            .with_builtin_variants()
            .build();
        assert_eq!(
            harness.variant_names(),
            vec!["chrono", "record", "array", "array_no_if"]
        );
    }

    #[test]
    fn one_record_per_variant_and_date() {
        let plan = quick_plan();
        let mut harness = HarnessBuilder::for_plan(&plan).with_builtin_variants().build();
        let mut seen = 0;
        let report = harness.run_with_hook(&plan, |_| seen += 1).unwrap();

        assert_eq!(report.records.len(), 4 * plan.dates.len());
        assert_eq!(seen, report.records.len());
        for record in &report.records {
            assert_eq!(record.forks, 2);
            assert_eq!(record.iterations, 4);
            assert_eq!(record.operations, 4 * 8);
            assert!(record.min_ns <= record.avg_ns && record.avg_ns <= record.max_ns);
        }
    }

    #[test]
    fn warmup_forks_are_discarded() {
        let plan = quick_plan();
        let mut harness = HarnessBuilder::for_plan(&plan)
            .with_variant(CountingVariant {
                calls: std::cell::Cell::new(0),
            })
            .build();
        let report = harness.run(&plan).unwrap();
        let per_date = report.records[0].operations;
        // 3 forks x (1 warm-up + 2 measured iterations) run, only 2 x 2 counted
        assert_eq!(per_date, 4 * 8);
    }

    #[test]
    fn empty_harness_yields_empty_report() {
        let plan = quick_plan();
        let mut harness = HarnessBuilder::for_plan(&plan).build();
        assert!(harness.run(&plan).unwrap().records.is_empty());
    }

    #[test]
    fn default_plan_verifies_cleanly() {
        let plan = BenchPlan::default();
        let harness = HarnessBuilder::for_plan(&plan).with_builtin_variants().build();
        assert!(harness.verify(&plan).unwrap().is_empty());
    }

    #[test]
    fn offset_29_is_reported_for_every_hand_written_variant() {
        let mut plan = BenchPlan::default();
        plan.dates = vec!["1/3/2022".to_string()];
        plan.days_before = 29;
        let harness = HarnessBuilder::for_plan(&plan).with_builtin_variants().build();
        let mismatches = harness.verify(&plan).unwrap();
        let names: Vec<&str> = mismatches.iter().map(|m| m.variant.as_str()).collect();
        assert_eq!(names, vec!["record", "array", "array_no_if"]);
        assert!(matches!(
            mismatches[1].actual,
            Err(DateError::OffsetTooLarge { days_before: 29, .. })
        ));
    }
}
