//! Benchmarks for per-attempt retry decisions
//!
//! Run with: cargo bench --bench delay_computation

use callretry_core::Code;
use callretry_core::retry::{RetryDecider, RetryPolicy, delay_for_attempt, raw_delay_for_attempt};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

fn bench_raw_delay(c: &mut Criterion) {
    let policy = RetryPolicy::new(Duration::from_millis(100)).with_maximum_interval(None);

    let mut group = c.benchmark_group("raw_delay_for_attempt");
    for attempt in [0u32, 10, 1_000, u32::MAX] {
        group.bench_with_input(BenchmarkId::from_parameter(attempt), &attempt, |b, &n| {
            b.iter(|| raw_delay_for_attempt(black_box(&policy), black_box(n)));
        });
    }
    group.finish();
}

fn bench_jittered_delay(c: &mut Criterion) {
    let policy = RetryPolicy::new(Duration::from_millis(100));

    c.bench_function("delay_for_attempt_with_jitter", |b| {
        b.iter(|| delay_for_attempt(black_box(&policy), black_box(5)));
    });
}

fn bench_classification(c: &mut Criterion) {
    let policy = RetryPolicy::new(Duration::from_millis(100));

    c.bench_function("decider_is_retryable", |b| {
        b.iter(|| {
            let decider = RetryDecider::new(Some(&policy), black_box(true));
            Code::ALL
                .iter()
                .filter(|code| decider.is_retryable(**code))
                .count()
        });
    });
}

criterion_group!(
    benches,
    bench_raw_delay,
    bench_jittered_delay,
    bench_classification
);
criterion_main!(benches);
