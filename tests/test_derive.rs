//! Tests for derived feature columns

use winesight::pipeline::{
    category_labels, density_bucket, derive_features, numeric_values, AlcoholCategory,
    CategoryColumn, LogTransform, Measure, NumericColumn, QualityCategory, Sweetness,
};
use winesight::AnalysisError;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_derivation_appends_six_columns() {
    let df = create_small_wine_dataframe();
    let derived = derive_features(&df, LogTransform::Identity).unwrap();

    assert_shape(&derived, df.height(), df.width() + 6);
    assert_has_columns(
        &derived,
        &[
            "sweetness",
            "alcohol_category",
            "quality_category",
            "density_bucket",
            "log_chlorides",
            "log_free_sulfur_dioxide",
        ],
    );

    // Base columns are untouched
    for name in WINE_COLUMNS {
        let before = df.column(name).unwrap().as_materialized_series();
        let after = derived.column(name).unwrap().as_materialized_series();
        assert!(before.equals(after), "column {} changed", name);
    }
}

#[test]
fn test_derivation_is_idempotent() {
    let df = create_small_wine_dataframe();
    let once = derive_features(&df, LogTransform::Natural).unwrap();
    let twice = derive_features(&once, LogTransform::Natural).unwrap();
    assert!(once.equals(&twice));
}

#[test]
fn test_every_row_gets_exactly_one_known_level() {
    let df = derive_features(&create_small_wine_dataframe(), LogTransform::Identity).unwrap();

    let sweetness: Vec<&str> = Sweetness::LEVELS.iter().map(|s| s.label()).collect();
    for label in category_labels(&df, CategoryColumn::Sweetness).unwrap() {
        assert_eq!(sweetness.iter().filter(|l| **l == label).count(), 1);
    }

    let quality: Vec<&str> = QualityCategory::LEVELS.iter().map(|q| q.label()).collect();
    for label in category_labels(&df, CategoryColumn::QualityCategory).unwrap() {
        assert!(quality.contains(&label.as_str()), "unknown level {}", label);
    }
}

#[test]
fn test_categories_monotonic_in_value() {
    let mut previous_sweetness = Sweetness::Dry;
    let mut previous_alcohol = AlcoholCategory::VeryLow;
    let mut previous_quality = QualityCategory::Poor;

    for step in 0..=700 {
        let v = step as f64 * 0.1;
        let s = Sweetness::from_residual_sugar(v).unwrap();
        let a = AlcoholCategory::from_alcohol(v / 4.0).unwrap();
        let q = QualityCategory::from_quality(v / 7.0).unwrap();
        assert!(s >= previous_sweetness);
        assert!(a >= previous_alcohol);
        assert!(q >= previous_quality);
        previous_sweetness = s;
        previous_alcohol = a;
        previous_quality = q;
    }
    assert_eq!(previous_sweetness, Sweetness::Sweet);
    assert_eq!(previous_alcohol, AlcoholCategory::VeryHigh);
    assert_eq!(previous_quality, QualityCategory::Good);
}

#[test]
fn test_boundary_values_go_to_higher_bin() {
    assert_eq!(Sweetness::from_residual_sugar(4.0).unwrap(), Sweetness::MediumDry);
    assert_eq!(Sweetness::from_residual_sugar(45.0).unwrap(), Sweetness::Sweet);
    assert_eq!(QualityCategory::from_quality(5.0).unwrap(), QualityCategory::Poor);
    assert_eq!(QualityCategory::from_quality(6.0).unwrap(), QualityCategory::Average);
    assert_eq!(QualityCategory::from_quality(8.0).unwrap(), QualityCategory::Good);
}

#[test]
fn test_density_buckets() {
    assert_eq!(density_bucket(0.9925).unwrap(), "[0.990, 0.995)");
    assert_eq!(density_bucket(1.001).unwrap(), "[1.000, 1.005)");
    assert_ne!(density_bucket(0.989).unwrap(), density_bucket(0.991).unwrap());
}

#[test]
fn test_non_finite_input_is_data_error() {
    assert!(matches!(
        Sweetness::from_residual_sugar(f64::NAN),
        Err(AnalysisError::Data(_))
    ));
    assert!(matches!(density_bucket(f64::INFINITY), Err(AnalysisError::Data(_))));
}

#[test]
fn test_log_modes() {
    let df = create_small_wine_dataframe();
    let chlorides = numeric_values(&df, Measure::Chlorides.into()).unwrap();

    let identity = derive_features(&df, LogTransform::Identity).unwrap();
    assert_eq!(
        numeric_values(&identity, NumericColumn::LogChlorides).unwrap(),
        chlorides
    );

    let natural = derive_features(&df, LogTransform::Natural).unwrap();
    let logged = numeric_values(&natural, NumericColumn::LogChlorides).unwrap();
    for (raw, log) in chlorides.iter().zip(&logged) {
        assert!((raw.ln() - log).abs() < 1e-12);
    }
}

#[test]
fn test_natural_log_of_zero_is_data_error() {
    let df = with_constant_column(&create_small_wine_dataframe(), "free_sulfur_dioxide", 0.0);
    assert!(matches!(
        derive_features(&df, LogTransform::Natural),
        Err(AnalysisError::Data(_))
    ));
}

#[test]
fn test_missing_base_column_is_column_not_found() {
    let df = create_small_wine_dataframe().drop("alcohol").unwrap();
    let err = derive_features(&df, LogTransform::Identity).unwrap_err();
    assert!(matches!(err, AnalysisError::ColumnNotFound(name) if name == "alcohol"));
}
