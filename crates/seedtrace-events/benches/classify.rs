use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use seedtrace_events::{history, parse_events, partition_by_category, DomainEvent};
use seedtrace_test_utils::{licensing_values, lifecycle_values};
use serde_json::Value;

fn batch(size: usize) -> Vec<DomainEvent> {
    licensing_values()
        .into_iter()
        .chain(lifecycle_values())
        .cycle()
        .take(size)
        .map(DomainEvent::from_value)
        .collect()
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("events.history");
    for size in [100usize, 1_000, 10_000] {
        let events = batch(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &events, |b, events| {
            b.iter(|| partition_by_category(history(black_box(events))));
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let document = Value::Array(
        licensing_values()
            .into_iter()
            .chain(lifecycle_values())
            .cycle()
            .take(1_000)
            .collect(),
    )
    .to_string();

    c.bench_function("events.parse_events.1000", |b| {
        b.iter(|| parse_events(black_box(&document)));
    });
}

criterion_group!(benches, bench_history, bench_parse);
criterion_main!(benches);
