//! Report module - assembling the analysis and writing it out
//!
//! `generate_report` runs every stage against one loaded table. Stages that
//! fail with a section-local error (degenerate input, impossible folds) are
//! recorded as skipped with the reason; anything else aborts the run.

pub mod document;
pub mod export;
pub mod gallery;
pub mod narrative;
pub mod summary;

pub use document::render_html;
pub use export::{export_report, ReportExport, ReportMetadata};
pub use gallery::render_gallery;
pub use narrative::narrative;
pub use summary::*;

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use serde::Serialize;

use crate::charts::{Chart, ChartOptions};
use crate::error::{AnalysisError, Result};
use crate::model::{
    cross_validate_forest, cross_validate_linear, ClassifierReport, ModelConfig, ModelData,
    RegressionReport,
};
use crate::pipeline::{
    base_correlation_matrix, derive_features, log_correlation_gains, summarize_table,
    CorrelatedPair, CorrelationMatrix, HeatmapOrder, LogCorrelationGain, LogTransform,
    NumericColumn, TableSummary, QUALITY_COLUMN,
};

/// File name of the HTML document inside the output directory
pub const HTML_FILE: &str = "report.html";

/// File name of the JSON export inside the output directory
pub const JSON_FILE: &str = "summary.json";

/// Everything that shapes one report run
#[derive(Debug, Clone, Serialize)]
pub struct ReportConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub log_mode: LogTransform,
    pub heatmap_order: HeatmapOrder,
    pub model: ModelConfig,
    pub skip_models: bool,
    pub charts: bool,
    pub width: u32,
    pub height: u32,
}

impl ReportConfig {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            log_mode: LogTransform::default(),
            heatmap_order: HeatmapOrder::default(),
            model: ModelConfig::default(),
            skip_models: false,
            charts: true,
            width: 800,
            height: 600,
        }
    }

    /// Base options every chart in the gallery starts from
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions::sized(self.width, self.height).with_order(self.heatmap_order)
    }
}

/// Outcome of one report section
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "lowercase")]
pub enum Section<T> {
    Completed(T),
    Skipped(String),
}

impl<T> Section<T> {
    /// Keep section-local failures as a skip note; propagate everything else.
    pub fn from_result(result: Result<T>) -> Result<Self> {
        match result {
            Ok(value) => Ok(Section::Completed(value)),
            Err(e) if e.is_section_local() => Ok(Section::Skipped(e.to_string())),
            Err(e) => Err(e),
        }
    }

    pub fn completed(&self) -> Option<&T> {
        match self {
            Section::Completed(value) => Some(value),
            Section::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&str> {
        match self {
            Section::Completed(_) => None,
            Section::Skipped(reason) => Some(reason),
        }
    }
}

/// Correlation results the report presents
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationFindings {
    pub matrix: CorrelationMatrix,
    /// Every column's correlation with quality, strongest first
    pub with_quality: Vec<(NumericColumn, f64)>,
    /// Strongest pairs among the measures (quality excluded)
    pub strongest_pairs: Vec<CorrelatedPair>,
}

/// Number of feature pairs listed in the report
const TOP_PAIRS: usize = 5;

pub fn correlation_findings(df: &DataFrame) -> Result<CorrelationFindings> {
    let matrix = base_correlation_matrix(df)?;
    let with_quality = matrix.correlations_with(NumericColumn::Quality);
    let strongest_pairs = matrix
        .pairs()
        .into_iter()
        .filter(|p| p.feature1 != QUALITY_COLUMN && p.feature2 != QUALITY_COLUMN)
        .take(TOP_PAIRS)
        .collect();

    Ok(CorrelationFindings {
        matrix,
        with_quality,
        strongest_pairs,
    })
}

/// The assembled analysis of one table
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub config: ReportConfig,
    pub summary: TableSummary,
    pub correlations: Section<CorrelationFindings>,
    pub log_gains: Section<Vec<LogCorrelationGain>>,
    pub classifier: Section<ClassifierReport>,
    pub regression: Section<RegressionReport>,
    pub charts: Vec<Chart>,
    /// Charts that could not be drawn, with the reason
    pub chart_notes: Vec<String>,
}

impl Report {
    /// Reasons of every skipped section, labelled by section
    pub fn skipped_sections(&self) -> Vec<(&'static str, &str)> {
        [
            ("Correlation analysis", self.correlations.skip_reason()),
            ("Log-transform comparison", self.log_gains.skip_reason()),
            ("Random forest", self.classifier.skip_reason()),
            ("Linear regression", self.regression.skip_reason()),
        ]
        .into_iter()
        .filter_map(|(name, reason)| reason.map(|r| (name, r)))
        .collect()
    }
}

/// Fit both models, each as its own section.
pub fn fit_models(
    df: &DataFrame,
    config: &ReportConfig,
) -> Result<(Section<ClassifierReport>, Section<RegressionReport>)> {
    if config.skip_models {
        let reason = "modeling disabled for this run".to_string();
        return Ok((Section::Skipped(reason.clone()), Section::Skipped(reason)));
    }
    let data = ModelData::from_table(df)?;
    Ok((
        Section::from_result(cross_validate_forest(&data, &config.model))?,
        Section::from_result(cross_validate_linear(&data, &config.model))?,
    ))
}

/// Stages of a report run, in the order `generate_report_with` runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Derive,
    Summary,
    Correlation,
    Models,
    Charts,
}

/// Hooks into a report run. Every hook defaults to doing nothing.
pub trait StageObserver {
    fn started(&mut self, _stage: Stage, _config: &ReportConfig) {}
    fn derived(&mut self, _df: &DataFrame) {}
    fn summarized(&mut self, _summary: &TableSummary) {}
    fn correlated(
        &mut self,
        _findings: &Section<CorrelationFindings>,
        _gains: &Section<Vec<LogCorrelationGain>>,
    ) {
    }
    fn modeled(&mut self, _classifier: &Section<ClassifierReport>, _regression: &Section<RegressionReport>) {}
    fn charted(&mut self, _charts: &[Chart], _notes: &[String]) {}
}

impl StageObserver for () {}

/// Run every stage on a loaded table. `base` must come from the loader.
pub fn generate_report(base: &DataFrame, config: &ReportConfig) -> Result<Report> {
    generate_report_with(base, config, &mut ())
}

/// `generate_report`, telling `observer` as each stage starts and finishes.
pub fn generate_report_with(
    base: &DataFrame,
    config: &ReportConfig,
    observer: &mut impl StageObserver,
) -> Result<Report> {
    observer.started(Stage::Derive, config);
    let df = derive_features(base, config.log_mode)?;
    observer.derived(&df);

    observer.started(Stage::Summary, config);
    let summary = summarize_table(&df)?;
    observer.summarized(&summary);

    observer.started(Stage::Correlation, config);
    let correlations = Section::from_result(correlation_findings(&df))?;
    let log_gains = Section::from_result(log_correlation_gains(&df))?;
    observer.correlated(&correlations, &log_gains);

    observer.started(Stage::Models, config);
    let (classifier, regression) = fit_models(&df, config)?;
    observer.modeled(&classifier, &regression);

    observer.started(Stage::Charts, config);
    let (charts, chart_notes) = if config.charts {
        render_gallery(&df, correlations.completed().map(|c| &c.matrix), config)?
    } else {
        (Vec::new(), Vec::new())
    };
    observer.charted(&charts, &chart_notes);

    Ok(Report {
        config: config.clone(),
        summary,
        correlations,
        log_gains,
        classifier,
        regression,
        charts,
        chart_notes,
    })
}

/// Paths written by `write_report`
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub html: PathBuf,
    pub json: PathBuf,
    pub charts: Vec<PathBuf>,
}

/// Write the HTML document, the JSON export and one SVG per chart into `dir`.
pub fn write_report(report: &Report, dir: &Path) -> Result<ReportFiles> {
    std::fs::create_dir_all(dir).map_err(|e| {
        AnalysisError::Data(format!(
            "Cannot create output directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let charts = report
        .charts
        .iter()
        .map(|c| c.write_to(dir))
        .collect::<Result<Vec<_>>>()?;

    let html = dir.join(HTML_FILE);
    std::fs::write(&html, render_html(report))?;

    let json = dir.join(JSON_FILE);
    export_report(report, &json)?;

    Ok(ReportFiles { html, json, charts })
}
