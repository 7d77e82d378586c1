//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Quality score frequencies of the 4898-wine reference table
pub const REFERENCE_QUALITY_COUNTS: [(i64, usize); 7] = [
    (3, 20),
    (4, 163),
    (5, 1457),
    (6, 2198),
    (7, 880),
    (8, 175),
    (9, 5),
];

/// Canonical column names in file order (after `id`)
pub const WINE_COLUMNS: [&str; 12] = [
    "fixed_acidity",
    "volatile_acidity",
    "citric_acid",
    "residual_sugar",
    "chlorides",
    "free_sulfur_dioxide",
    "total_sulfur_dioxide",
    "density",
    "ph",
    "sulphates",
    "alcohol",
    "quality",
];

/// Quality scores expanded from (score, count) pairs, grouped by score
pub fn expand_counts(counts: &[(i64, usize)]) -> Vec<i64> {
    counts
        .iter()
        .flat_map(|&(q, n)| std::iter::repeat(q).take(n))
        .collect()
}

/// Build a wine table in the canonical schema for the given quality scores.
///
/// Alcohol rises and volatile acidity falls with quality; density falls with
/// alcohol. Every other measure is seeded noise. Alcohol stays in [8.0, 13.2].
pub fn create_wine_dataframe(qualities: &[i64], seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = qualities.len();
    let mut cols: Vec<Vec<f64>> = vec![Vec::with_capacity(n); 11];

    for &q in qualities {
        let level = (q - 3) as f64;
        let alcohol = 8.0 + 0.6 * level + 1.6 * rng.gen::<f64>();
        let sugar_u: f64 = rng.gen();

        cols[0].push(6.0 + 2.0 * rng.gen::<f64>());
        cols[1].push(0.45 - 0.03 * level + 0.1 * rng.gen::<f64>());
        cols[2].push(0.2 + 0.3 * rng.gen::<f64>());
        cols[3].push(0.8 + 20.0 * sugar_u * sugar_u);
        cols[4].push(0.02 + 0.06 * rng.gen::<f64>());
        cols[5].push(5.0 + 60.0 * rng.gen::<f64>());
        cols[6].push(60.0 + 150.0 * rng.gen::<f64>());
        cols[7].push(1.002 - 0.0012 * (alcohol - 8.0) + 0.002 * rng.gen::<f64>());
        cols[8].push(2.9 + 0.5 * rng.gen::<f64>());
        cols[9].push(0.3 + 0.5 * rng.gen::<f64>());
        cols[10].push(alcohol);
    }

    let mut columns: Vec<Column> = Vec::with_capacity(13);
    columns.push(Column::new("id".into(), (1..=n as i64).collect::<Vec<i64>>()));
    for (name, values) in WINE_COLUMNS.iter().zip(cols) {
        columns.push(Column::new((*name).into(), values));
    }
    columns.push(Column::new("quality".into(), qualities.to_vec()));
    DataFrame::new(columns).unwrap()
}

/// The 4898-row reference table with quality scores 3-9
pub fn create_reference_dataframe() -> DataFrame {
    create_wine_dataframe(&expand_counts(&REFERENCE_QUALITY_COUNTS), 42)
}

/// A small table with every score 3-8 well represented
pub fn create_small_wine_dataframe() -> DataFrame {
    create_wine_dataframe(
        &expand_counts(&[(3, 12), (4, 24), (5, 60), (6, 80), (7, 40), (8, 24)]),
        7,
    )
}

/// Replace one column of `df` with a constant
pub fn with_constant_column(df: &DataFrame, name: &str, value: f64) -> DataFrame {
    let mut out = df.clone();
    out.with_column(Column::new(name.into(), vec![value; df.height()]))
        .unwrap();
    out
}

/// Write `contents` to a file called `name` in a fresh temp directory
pub fn create_temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

/// Create a temporary directory with a test CSV file using `separator`
pub fn create_temp_csv(df: &mut DataFrame, separator: u8) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("wine.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file)
        .with_separator(separator)
        .finish(df)
        .unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("wine.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Three wines in the raw UCI layout: semicolon separated, no id, spaced headers
pub const UCI_SAMPLE: &str = "\"fixed acidity\";\"volatile acidity\";\"citric acid\";\"residual sugar\";\"chlorides\";\"free sulfur dioxide\";\"total sulfur dioxide\";\"density\";\"pH\";\"sulphates\";\"alcohol\";\"quality\"
7;0.27;0.36;20.7;0.045;45;170;1.001;3;0.45;8.8;6
6.3;0.3;0.34;1.6;0.049;14;132;0.994;3.3;0.49;9.5;6
8.1;0.28;0.4;6.9;0.05;30;97;0.9951;3.26;0.44;10.1;5
";

/// The same three wines as exported from R: comma separated with a leading id column
pub const R_EXPORT_SAMPLE: &str = "\"\",\"fixed.acidity\",\"volatile.acidity\",\"citric.acid\",\"residual.sugar\",\"chlorides\",\"free.sulfur.dioxide\",\"total.sulfur.dioxide\",\"density\",\"pH\",\"sulphates\",\"alcohol\",\"quality\"
\"1\",7,0.27,0.36,20.7,0.045,45,170,1.001,3,0.45,8.8,6
\"2\",6.3,0.3,0.34,1.6,0.049,14,132,0.994,3.3,0.49,9.5,6
\"3\",8.1,0.28,0.4,6.9,0.05,30,97,0.9951,3.26,0.44,10.1,5
";

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}
