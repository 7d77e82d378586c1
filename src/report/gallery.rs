//! The fixed set of charts a report carries

use polars::prelude::DataFrame;

use super::ReportConfig;
use crate::charts::{box_plot, correlation_heatmap, histogram, scatter, Chart, ChartOptions};
use crate::error::{AnalysisError, Result};
use crate::pipeline::{CategoryColumn, CorrelationMatrix, Measure, NumericColumn};

/// Measures with long right tails, also shown on a log10 axis
const SKEWED: [Measure; 3] = [Measure::ResidualSugar, Measure::Chlorides, Measure::FreeSulfurDioxide];

/// Horizontal jitter for the discrete quality axis
const QUALITY_JITTER: f64 = 0.2;

enum Plan {
    Histogram(NumericColumn, ChartOptions),
    Scatter(NumericColumn, NumericColumn, ChartOptions),
    BoxPlot(CategoryColumn, NumericColumn, ChartOptions),
}

fn plan(base: &ChartOptions) -> Vec<Plan> {
    let mut plan: Vec<Plan> = NumericColumn::base_columns()
        .into_iter()
        .map(|c| Plan::Histogram(c, base.clone().with_quantile_markers()))
        .collect();

    for m in SKEWED {
        plan.push(Plan::Histogram(
            m.into(),
            base.clone()
                .with_log_scale(true)
                .with_quantile_markers()
                .with_title(format!("Distribution of {} (log10 scale)", m.label())),
        ));
    }

    let alcohol: NumericColumn = Measure::Alcohol.into();
    let density: NumericColumn = Measure::Density.into();
    let sugar: NumericColumn = Measure::ResidualSugar.into();
    let volatile: NumericColumn = Measure::VolatileAcidity.into();

    plan.extend([
        Plan::Scatter(
            NumericColumn::Quality,
            alcohol,
            base.clone().with_jitter(QUALITY_JITTER).with_fit_line(),
        ),
        Plan::Scatter(alcohol, density, base.clone().with_fit_line()),
        Plan::Scatter(sugar, density, base.clone().with_log_scale(true).with_fit_line()),
        Plan::Scatter(
            alcohol,
            density,
            base.clone()
                .with_fit_line()
                .with_facet(CategoryColumn::QualityCategory),
        ),
        Plan::BoxPlot(CategoryColumn::QualityCategory, alcohol, base.clone()),
        Plan::BoxPlot(CategoryColumn::QualityCategory, volatile, base.clone()),
        Plan::BoxPlot(CategoryColumn::Sweetness, sugar, base.clone()),
        Plan::BoxPlot(CategoryColumn::AlcoholCategory, density, base.clone()),
        Plan::BoxPlot(CategoryColumn::DensityBucket, NumericColumn::Quality, base.clone()),
    ]);
    plan
}

fn draw(df: &DataFrame, item: &Plan) -> Result<Chart> {
    match item {
        Plan::Histogram(c, opts) => histogram(df, *c, opts),
        Plan::Scatter(x, y, opts) => scatter(df, *x, *y, opts),
        Plan::BoxPlot(cat, v, opts) => box_plot(df, *cat, *v, opts),
    }
}

/// Render every chart for a derived table.
///
/// A chart the backend cannot draw becomes a note instead of failing the
/// report; a missing column still fails, since it means derivation did not run.
pub fn render_gallery(
    df: &DataFrame,
    matrix: Option<&CorrelationMatrix>,
    config: &ReportConfig,
) -> Result<(Vec<Chart>, Vec<String>)> {
    let base = config.chart_options();
    let mut charts = Vec::new();
    let mut notes = Vec::new();

    let mut outcomes: Vec<Result<Chart>> = plan(&base).iter().map(|p| draw(df, p)).collect();
    match matrix {
        Some(matrix) => outcomes.push(correlation_heatmap(matrix, &base)),
        None => notes.push("Correlation heatmap not drawn: correlation analysis was skipped".to_string()),
    }

    for outcome in outcomes {
        match outcome {
            Ok(chart) => charts.push(chart),
            Err(e @ AnalysisError::Chart(_)) => notes.push(e.to_string()),
            Err(e) if e.is_section_local() => notes.push(e.to_string()),
            Err(e) => return Err(e),
        }
    }
    Ok((charts, notes))
}
