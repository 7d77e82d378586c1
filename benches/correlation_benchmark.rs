//! Benchmark comparing pairwise vs matrix-based correlation computation
//!
//! Run with: cargo bench --bench correlation_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use winesight::pipeline::{correlation_matrix, numeric_values, pearson, NumericColumn};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{create_wine_dataframe, expand_counts, REFERENCE_QUALITY_COUNTS};

/// Quality scores with the reference frequencies, repeated `times` over
fn scaled_qualities(times: usize) -> Vec<i64> {
    let scaled: Vec<(i64, usize)> = REFERENCE_QUALITY_COUNTS
        .iter()
        .map(|&(q, n)| (q, n * times))
        .collect();
    expand_counts(&scaled)
}

fn pairwise(columns: &[Vec<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(columns.len() * columns.len());
    for a in columns {
        for b in columns {
            out.push(pearson(a, b));
        }
    }
    out
}

/// Pairwise vs matrix correlation over the twelve base columns
fn benchmark_correlation_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_by_rows");
    group.sample_size(20);

    let columns = NumericColumn::base_columns();

    for times in [1, 5, 20] {
        let df = create_wine_dataframe(&scaled_qualities(times), 42);
        let values: Vec<Vec<f64>> = columns
            .iter()
            .map(|&c| numeric_values(&df, c).unwrap())
            .collect();

        group.throughput(Throughput::Elements(df.height() as u64));

        group.bench_with_input(BenchmarkId::new("pairwise", df.height()), &values, |b, values| {
            b.iter(|| pairwise(black_box(values)));
        });

        group.bench_with_input(BenchmarkId::new("matrix", df.height()), &df, |b, df| {
            b.iter(|| correlation_matrix(black_box(df), black_box(&columns)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_correlation_by_rows);
criterion_main!(benches);
