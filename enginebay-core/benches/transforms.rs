//! Benchmarks for the per-sample transform work inside one tick
//!
//! Run with: cargo bench -p enginebay-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use enginebay_core::{
    CurveTable, EdgeCounter, GraphBuilder, Linear, MemorySink, MovingAverage, Producer,
    RepeatSensor, Transform, VoltageDividerR2,
};

fn bench_curve_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("curve_lookup");

    for points in [2_usize, 10, 32] {
        let rows: Vec<(f32, f32)> =
            (0..points).map(|i| (i as f32 * 10.0, 400.0 - i as f32)).collect();
        let table = CurveTable::from_points(&rows).expect("rows are ascending");
        let span = rows[points - 1].0;

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("lookup", points), &table, |b, table| {
            let mut x = 0.0_f32;
            b.iter(|| {
                x = (x + 1.7) % span;
                black_box(table.lookup(black_box(x)))
            });
        });
    }

    group.finish();
}

fn bench_moving_average(c: &mut Criterion) {
    let mut group = c.benchmark_group("moving_average");

    for window in [2_usize, 4, 64] {
        group.bench_with_input(BenchmarkId::new("apply", window), &window, |b, &window| {
            let mut average = MovingAverage::new(window, 1.0);
            let mut x = 0.0_f32;
            b.iter(|| {
                x += 0.25;
                black_box(average.apply(black_box(x)))
            });
        });
    }

    group.finish();
}

fn bench_divider(c: &mut Criterion) {
    let divider = VoltageDividerR2::new(120.0, 3.5);
    c.bench_function("divider_convert", |b| {
        b.iter(|| black_box(divider.convert(black_box(1.75))))
    });
}

fn bench_counter_drain(c: &mut Criterion) {
    let counter = EdgeCounter::new();
    c.bench_function("edge_record_and_drain", |b| {
        b.iter(|| {
            counter.record_edge();
            black_box(counter.drain())
        })
    });
}

fn bench_chain_firing(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_firing");

    for depth in [1_usize, 4, 8] {
        let memory = MemorySink::shared();
        let mut graph = GraphBuilder::new();
        let source = graph.add_producer(RepeatSensor::new("source", 1000, || Ok(1.0_f32)));
        let mut tail = graph.add_transform(Linear::new(1.0, 0.1));
        graph.connect(&source, &tail).expect("fresh graph");
        for _ in 1..depth {
            let next = graph.add_transform(Linear::new(1.0, 0.1));
            graph.connect(&tail, &next).expect("chain is acyclic");
            tail = next;
        }
        let out = graph.add_sink::<f32>("bench.value", memory.clone());
        graph.connect(&tail, &out).expect("chain is acyclic");
        let _pipeline = graph.build().expect("graph builds");

        group.bench_with_input(BenchmarkId::new("fire", depth), &depth, |b, _| {
            b.iter(|| {
                source.borrow_mut().fire(black_box(0));
                memory.borrow_mut().clear();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_curve_lookup,
    bench_moving_average,
    bench_divider,
    bench_counter_drain,
    bench_chain_firing
);
criterion_main!(benches);
