//! Benchmark random forest fitting and full cross-validation
//!
//! Run with: cargo bench --bench forest_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use winesight::model::{cross_validate_forest, ForestParams, ModelConfig, ModelData, RandomForest};

#[path = "../tests/common/mod.rs"]
mod common;

use common::create_reference_dataframe;

/// Single forest fit on the 4898-row table for varying ensemble sizes
fn benchmark_forest_by_trees(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_by_trees");
    group.sample_size(10);

    let data = ModelData::from_table(&create_reference_dataframe()).unwrap();
    let (_, labels) = data.class_labels();

    for n_trees in [10, 50, 100] {
        group.bench_with_input(BenchmarkId::new("fit", n_trees), &n_trees, |b, &n_trees| {
            b.iter(|| {
                RandomForest::fit(
                    black_box(&data.x),
                    black_box(&labels),
                    ForestParams {
                        n_trees,
                        mtry: None,
                        seed: 42,
                    },
                )
            });
        });
    }

    group.finish();
}

/// Three-fold cross-validation plus the final fit
fn benchmark_cross_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_cross_validation");
    group.sample_size(10);

    let data = ModelData::from_table(&create_reference_dataframe()).unwrap();
    let config = ModelConfig {
        trees: 50,
        ..ModelConfig::default()
    };

    group.bench_function("3_fold_50_trees", |b| {
        b.iter(|| cross_validate_forest(black_box(&data), black_box(&config)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_forest_by_trees, benchmark_cross_validation);
criterion_main!(benches);
