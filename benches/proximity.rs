//! Benchmarks for the O(n²) proximity scan.
//!
//! Run with: `cargo bench --bench proximity`

use constellation::prelude::*;
use constellation::spawn::SpawnContext;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn store(count: usize) -> ParticleStore {
    let mut ctx = SpawnContext::new(Some(9), Bounds::new(1280.0, 720.0));
    ParticleStore::initialize(count, &mut ctx, &SpawnSettings::default(), 4)
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("proximity_rebuild");

    for count in [50, 100, 200, 400] {
        let store = store(count);
        let mut graph = ProximityGraph::new(10, count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &store, |b, store| {
            b.iter(|| {
                graph.rebuild(black_box(store), 120.0);
                black_box(graph.edge_count())
            })
        });
    }

    group.finish();
}

fn bench_bucket_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("proximity_buckets");
    let store = store(200);

    for buckets in [1, 10, 64] {
        let mut graph = ProximityGraph::new(buckets, store.len());
        group.bench_function(BenchmarkId::from_parameter(buckets), |b| {
            b.iter(|| graph.rebuild(black_box(&store), 120.0))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rebuild, bench_bucket_count);
criterion_main!(benches);
