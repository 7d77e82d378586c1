//! Tests for SVG chart rendering

use tempfile::TempDir;
use winesight::charts::{
    box_plot, correlation_heatmap, histogram, histogram::equal_width_bins, scatter, ChartOptions,
};
use winesight::pipeline::{
    base_correlation_matrix, derive_features, CategoryColumn, HeatmapOrder, LogTransform, Measure,
    NumericColumn,
};
use winesight::AnalysisError;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn small_options() -> ChartOptions {
    ChartOptions::sized(400, 300)
}

#[test]
fn test_histogram_variants_render_svg() {
    let df = create_small_wine_dataframe();

    let plain = histogram(&df, Measure::Alcohol.into(), &small_options()).unwrap();
    assert!(plain.svg.contains("<svg"));
    assert!(!plain.name.is_empty());

    let marked = histogram(
        &df,
        Measure::ResidualSugar.into(),
        &small_options().with_quantile_markers().with_bins(20),
    )
    .unwrap();
    assert!(marked.svg.contains("<svg"));

    let logged = histogram(
        &df,
        Measure::Chlorides.into(),
        &small_options().with_log_scale(true).with_title("Chlorides (log10)"),
    )
    .unwrap();
    assert_eq!(logged.title, "Chlorides (log10)");
    assert!(logged.svg.contains("Chlorides (log10)"));
}

#[test]
fn test_log_histogram_name_differs_from_linear() {
    let df = create_small_wine_dataframe();
    let linear = histogram(&df, Measure::Chlorides.into(), &small_options()).unwrap();
    let logged = histogram(
        &df,
        Measure::Chlorides.into(),
        &small_options().with_log_scale(true),
    )
    .unwrap();
    assert_eq!(linear.name, "histogram_chlorides");
    assert_eq!(logged.name, "histogram_chlorides_log10");
}

#[test]
fn test_log_scale_rejects_zero() {
    let df = with_constant_column(&create_small_wine_dataframe(), "citric_acid", 0.0);
    let err = histogram(
        &df,
        Measure::CitricAcid.into(),
        &small_options().with_log_scale(true),
    )
    .unwrap_err();
    assert!(matches!(err, AnalysisError::Chart(_)));
}

#[test]
fn test_equal_width_bins_keep_every_value() {
    let values = [1.0, 1.5, 2.0, 2.5, 3.0];
    let bins = equal_width_bins(&values, 4);
    assert_eq!(bins.len(), 4);
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
    assert_eq!(bins[0].lo, 1.0);
    assert_eq!(bins[3].hi, 3.0);
    // Maximum lands in the last bin
    assert_eq!(bins[3].count, 2);
}

#[test]
fn test_scatter_plain_and_faceted() {
    let df = derive_features(&create_small_wine_dataframe(), LogTransform::Identity).unwrap();

    let plain = scatter(
        &df,
        NumericColumn::Quality,
        Measure::Alcohol.into(),
        &small_options().with_jitter(0.2).with_fit_line(),
    )
    .unwrap();
    assert!(plain.svg.contains("<svg"));

    let faceted = scatter(
        &df,
        Measure::Alcohol.into(),
        Measure::Density.into(),
        &small_options().with_facet(CategoryColumn::QualityCategory),
    )
    .unwrap();
    // One panel title per quality level
    for level in ["poor", "average", "good"] {
        assert!(faceted.svg.contains(level), "missing panel {}", level);
    }
}

#[test]
fn test_facet_needs_derived_column() {
    let df = create_small_wine_dataframe();
    let err = scatter(
        &df,
        Measure::Alcohol.into(),
        Measure::Density.into(),
        &small_options().with_facet(CategoryColumn::QualityCategory),
    )
    .unwrap_err();
    assert!(matches!(err, AnalysisError::ColumnNotFound(_)));
}

#[test]
fn test_box_plot_by_category() {
    let df = derive_features(&create_small_wine_dataframe(), LogTransform::Identity).unwrap();
    let chart = box_plot(
        &df,
        CategoryColumn::AlcoholCategory,
        NumericColumn::Quality,
        &small_options(),
    )
    .unwrap();
    assert!(chart.svg.contains("<svg"));
    assert!(chart.svg.contains("very-low"));
}

#[test]
fn test_heatmap_every_order() {
    let df = create_small_wine_dataframe();
    let matrix = base_correlation_matrix(&df).unwrap();

    for order in [HeatmapOrder::Original, HeatmapOrder::Alphabetical, HeatmapOrder::Quality] {
        let chart = correlation_heatmap(&matrix, &small_options().with_order(order)).unwrap();
        assert!(chart.svg.contains("<svg"));
        assert!(chart.svg.contains("1.00"), "diagonal labels missing for {:?}", order);
    }
}

#[test]
fn test_chart_written_as_svg_file() {
    let df = create_small_wine_dataframe();
    let chart = histogram(&df, Measure::Ph.into(), &small_options()).unwrap();

    let dir = TempDir::new().unwrap();
    let path = chart.write_to(dir.path()).unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("svg"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), chart.svg);
}
