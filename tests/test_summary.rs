//! Tests for descriptive statistics on the reference table

use winesight::pipeline::{
    category_counts, derive_features, describe, quality_distribution, summarize_table,
    CategoryColumn, LogTransform, Measure, NumericColumn,
};

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_reference_table_alcohol_and_quality_mode() {
    let df = create_reference_dataframe();
    assert_eq!(df.height(), 4898);

    let derived = derive_features(&df, LogTransform::Identity).unwrap();
    let summary = summarize_table(&derived).unwrap();

    let alcohol = summary.column(Measure::Alcohol.into()).unwrap();
    assert!(alcohol.min >= 8.0 && alcohol.max <= 14.2);
    assert!(
        (alcohol.mean - 10.5).abs() <= 0.5,
        "mean alcohol {} not within 10.5 ± 0.5",
        alcohol.mean
    );

    assert_eq!(summary.quality.mode(), Some(6));
    assert_eq!(summary.quality.min_score(), Some(3));
    assert_eq!(summary.quality.max_score(), Some(9));
    assert_eq!(summary.quality.counts.get(&6), Some(&2198));
    assert_eq!(summary.rows, 4898);

    let sweetness = summary.categories_of(CategoryColumn::Sweetness).unwrap();
    assert_eq!(sweetness.total(), 4898);
}

#[test]
fn test_quartiles_are_ordered() {
    let df = create_reference_dataframe();
    for s in describe(&df, &NumericColumn::base_columns()).unwrap() {
        assert!(s.min <= s.q1, "{}", s.name);
        assert!(s.q1 <= s.median, "{}", s.name);
        assert!(s.median <= s.q3, "{}", s.name);
        assert!(s.q3 <= s.max, "{}", s.name);
        assert!(s.mean >= s.min && s.mean <= s.max, "{}", s.name);
        assert_eq!(s.count, 4898);
    }
}

#[test]
fn test_category_counts_cover_every_row() {
    let df = derive_features(&create_small_wine_dataframe(), LogTransform::Identity).unwrap();

    for column in CategoryColumn::ALL {
        let counts = category_counts(&df, column).unwrap();
        assert_eq!(counts.total(), df.height(), "{:?}", column);
    }

    // Fixed-level columns list empty levels too
    let alcohol = category_counts(&df, CategoryColumn::AlcoholCategory).unwrap();
    let levels: Vec<&str> = alcohol.counts.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(levels, vec!["very-low", "moderately-low", "high", "very-high"]);
}

#[test]
fn test_quality_category_counts_match_scores() {
    let df = derive_features(&create_small_wine_dataframe(), LogTransform::Identity).unwrap();
    let counts = category_counts(&df, CategoryColumn::QualityCategory).unwrap();

    // Scores 3-5 are poor, 6-7 average, 8 good
    assert_eq!(counts.count_of("poor"), 12 + 24 + 60);
    assert_eq!(counts.count_of("average"), 80 + 40);
    assert_eq!(counts.count_of("good"), 24);
}

#[test]
fn test_summary_is_deterministic() {
    let df = derive_features(&create_small_wine_dataframe(), LogTransform::Natural).unwrap();
    let a = summarize_table(&df).unwrap();
    let b = summarize_table(&df).unwrap();
    assert_eq!(a.columns, b.columns);
    assert_eq!(a.categories, b.categories);
    assert_eq!(quality_distribution(&df).unwrap(), a.quality);
}
