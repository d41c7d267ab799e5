//! Criterion benchmarks for the ingest path.
//!
//! Benchmarks:
//! 1. Column normalization (provider frame → canonical frame → rows)
//! 2. DuckDB append (in-memory and on-disk)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use polars::prelude::*;

use tickerbase_core::data::Normalizer;
use tickerbase_core::domain::PriceRow;
use tickerbase_core::store::{self, PriceStore, DEFAULT_TABLE};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_native_frame(n: usize) -> DataFrame {
    let closes: Vec<f64> = (0..n).map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0).collect();
    let days: Vec<i32> = (0..n as i32).map(|i| 18_263 + i).collect();
    let date = Series::new("Date".into(), days)
        .cast(&DataType::Date)
        .unwrap();

    DataFrame::new(vec![
        Column::Series(date.into()),
        Column::new("Open".into(), closes.iter().map(|c| c - 0.3).collect::<Vec<f64>>()),
        Column::new("High".into(), closes.iter().map(|c| c + 1.5).collect::<Vec<f64>>()),
        Column::new("Low".into(), closes.iter().map(|c| c - 1.5).collect::<Vec<f64>>()),
        Column::new("Close".into(), closes.clone()),
        Column::new("Adj Close".into(), closes),
        Column::new(
            "Volume".into(),
            (0..n as i64).map(|i| 1_000_000 + i % 500_000).collect::<Vec<i64>>(),
        ),
        Column::new("Dividends".into(), vec![0.0f64; n]),
    ])
    .unwrap()
}

fn make_rows(n: usize) -> Vec<PriceRow> {
    let frame = Normalizer::normalize(&make_native_frame(n), "BENCH").unwrap();
    Normalizer::to_rows(&frame).unwrap()
}

// ── 1. Normalization ─────────────────────────────────────────────────

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for &row_count in &[252, 1260, 5040] {
        let frame = make_native_frame(row_count);
        group.bench_with_input(
            BenchmarkId::new("frame_to_rows", row_count),
            &row_count,
            |b, _| {
                b.iter(|| {
                    let normalized = Normalizer::normalize(black_box(&frame), "BENCH").unwrap();
                    Normalizer::to_rows(&normalized).unwrap()
                });
            },
        );
    }

    group.finish();
}

// ── 2. DuckDB Append ─────────────────────────────────────────────────

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("duckdb_append");
    group.sample_size(10);

    for &row_count in &[252, 1260] {
        let rows = make_rows(row_count);

        group.bench_with_input(
            BenchmarkId::new("in_memory", row_count),
            &row_count,
            |b, _| {
                b.iter(|| {
                    let mut store = PriceStore::open_in_memory(DEFAULT_TABLE).unwrap();
                    store.append(black_box(&rows)).unwrap()
                });
            },
        );

        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("bench.duckdb");
        group.bench_with_input(
            BenchmarkId::new("file_ingest", row_count),
            &row_count,
            |b, _| {
                b.iter(|| store::ingest(black_box(&rows), &db, DEFAULT_TABLE).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_append);
criterion_main!(benches);
