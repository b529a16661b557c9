use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use datebench::{
    config::DEFAULT_DATES,
    rollback::{chrono_date_before, date_before, date_before_as_record, date_before_no_if},
    CalendarDate,
};

const DAYS_BEFORE: i32 = 14;

fn plan_dates() -> Vec<CalendarDate> {
    DEFAULT_DATES
        .iter()
        .map(|text| text.parse().expect("default plan dates are valid"))
        .collect()
}

fn benchmark_rollback(c: &mut Criterion) {
    let mut group = c.benchmark_group("date_minus_14");

    for date in plan_dates() {
        let label = date.to_string();

        group.bench_with_input(BenchmarkId::new("chrono", &label), &date, |b, d| {
            b.iter(|| {
                chrono::NaiveDate::from_ymd_opt(
                    black_box(d.year),
                    black_box(d.month) as u32,
                    black_box(d.day) as u32,
                )
                .and_then(|start| chrono_date_before(start, black_box(DAYS_BEFORE) as u64))
            })
        });

        group.bench_with_input(BenchmarkId::new("record", &label), &date, |b, d| {
            b.iter(|| {
                date_before_as_record(
                    black_box(d.day),
                    black_box(d.month),
                    black_box(d.year),
                    black_box(DAYS_BEFORE),
                )
            })
        });

        group.bench_with_input(BenchmarkId::new("array", &label), &date, |b, d| {
            b.iter(|| {
                date_before(
                    black_box(d.day),
                    black_box(d.month),
                    black_box(d.year),
                    black_box(DAYS_BEFORE),
                )
            })
        });

        group.bench_with_input(BenchmarkId::new("array_no_if", &label), &date, |b, d| {
            b.iter(|| {
                date_before_no_if(
                    black_box(d.day),
                    black_box(d.month),
                    black_box(d.year),
                    black_box(DAYS_BEFORE),
                )
            })
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_secs(3))
        .measurement_time(Duration::from_secs(3));
    targets = benchmark_rollback
}
criterion_main!(benches);
