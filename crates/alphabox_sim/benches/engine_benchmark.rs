//! Benchmark for full simulation runs.
//!
//! TARGET: a single-word run well under a millisecond, the full reference
//! board in a few milliseconds.
//!
//! Run with: cargo bench --package alphabox_sim --bench engine_benchmark

#![allow(missing_docs)]

use alphabox_sim::{
    BatchStats, DrawMode, RarityTable, RngSource, SimConfig, SimulationEngine, WeightedDraw,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn benchmark_single_draw(c: &mut Criterion) {
    let table = RarityTable::reference();
    let drawer = WeightedDraw::new(&table);
    let mut rng = RngSource::new(ChaCha8Rng::seed_from_u64(7));

    c.bench_function("single_normal_draw", |b| {
        b.iter(|| black_box(drawer.draw(black_box(DrawMode::Normal), &mut rng)));
    });
}

fn benchmark_runs(c: &mut Criterion) {
    let engine = SimulationEngine::reference();
    let mut group = c.benchmark_group("full_run");
    group.sample_size(20);

    let star_only = SimConfig::default().select_only(5, &[0]);
    group.bench_function("star_only", |b| {
        let mut rng = RngSource::new(ChaCha8Rng::seed_from_u64(1));
        b.iter(|| black_box(engine.run(&star_only, &mut rng)));
    });

    let all_words = SimConfig::default();
    group.bench_function("all_words", |b| {
        let mut rng = RngSource::new(ChaCha8Rng::seed_from_u64(2));
        b.iter(|| black_box(engine.run(&all_words, &mut rng)));
    });

    group.finish();
}

fn benchmark_batch(c: &mut Criterion) {
    let engine = SimulationEngine::reference();
    let config = SimConfig::default().select_only(5, &[0]);

    let mut group = c.benchmark_group("batch");
    group.throughput(Throughput::Elements(100));
    group.sample_size(10);

    group.bench_function("stats_100_runs", |b| {
        let mut rng = RngSource::new(ChaCha8Rng::seed_from_u64(3));
        b.iter(|| black_box(BatchStats::collect(&engine, &config, 100, &mut rng)));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_draw,
    benchmark_runs,
    benchmark_batch
);
criterion_main!(benches);
