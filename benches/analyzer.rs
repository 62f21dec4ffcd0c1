//! Moola - Analyzer and Simulation Benchmarks
//!
//! Run: cargo bench --bench analyzer

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use moola::games::{simulate_optimal_play, FlipProcessor, SeededEntropy, DEFAULT_MAX_STEPS};
use moola::simulation::{simulate_batch, BatchConfig};
use moola::{analyze, GameConfig, Side, WagerRecord};
use rust_decimal_macros::dec;

/// Play a seeded history of `len` wagers at 5% of a fixed bankroll
fn seeded_history(len: usize) -> Vec<WagerRecord> {
    let config = GameConfig::default();
    let mut processor = FlipProcessor::new(config, SeededEntropy::new(7));
    let balance = dec!(1_000);

    (0..len)
        .filter_map(|i| {
            let side = if i % 3 == 0 { Side::B } else { Side::A };
            let stake = if i % 5 == 0 { dec!(100) } else { dec!(50) };
            processor
                .process(stake, side, balance)
                .ok()
                .and_then(|result| result.outcome().copied())
                .map(|outcome| WagerRecord::new(i as u64 + 1, side, outcome, chrono::Utc::now()))
        })
        .collect()
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for len in [10usize, 100, 1_000] {
        let history = seeded_history(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &history, |b, history| {
            b.iter(|| black_box(analyze(history)));
        });
    }

    group.finish();
}

fn bench_optimal_play(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimal_play");

    group.bench_function("single_run", |b| {
        let mut source = SeededEntropy::new(42);
        b.iter(|| {
            black_box(simulate_optimal_play(
                dec!(25),
                dec!(150),
                0.6,
                dec!(0.01),
                DEFAULT_MAX_STEPS,
                &mut source,
            ))
        });
    });

    group.throughput(Throughput::Elements(1_000));
    group.bench_function("batch_1000_runs", |b| {
        let config = GameConfig::default();
        let batch = BatchConfig {
            runs: 1_000,
            seed: Some(42),
            ..Default::default()
        };
        b.iter(|| black_box(simulate_batch(&config, &batch)));
    });

    group.finish();
}

criterion_group!(benches, bench_analyze, bench_optimal_play);
criterion_main!(benches);
