//! Integration tests for the full report pipeline

use std::collections::HashSet;

use serde_json::Value;
use tempfile::TempDir;
use winesight::pipeline::{load_wine_table, LogTransform};
use winesight::charts::Chart;
use winesight::report::{
    generate_report, generate_report_with, write_report, ReportConfig, Section, Stage,
    StageObserver,
};

#[path = "common/mod.rs"]
mod common;

use common::*;

fn quick_config(dir: &TempDir) -> ReportConfig {
    let mut config = ReportConfig::new(dir.path().join("wine.csv"), dir.path().join("report"));
    config.model.trees = 10;
    config.width = 400;
    config.height = 300;
    config
}

#[test]
fn test_full_report_from_csv() {
    let mut df = create_small_wine_dataframe();
    let (dir, csv_path) = create_temp_csv(&mut df, b',');

    let base = load_wine_table(&csv_path).unwrap();
    let config = quick_config(&dir);
    let report = generate_report(&base, &config).unwrap();

    assert!(report.skipped_sections().is_empty());
    assert_eq!(report.summary.rows, 240);
    assert!(report.charts.len() > 20, "only {} charts", report.charts.len());

    let names: HashSet<&str> = report.charts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names.len(), report.charts.len(), "duplicate chart names");

    let files = write_report(&report, &config.output_dir).unwrap();
    assert_eq!(files.charts.len(), report.charts.len());
    assert!(files.charts.iter().all(|p| p.exists()));
    let paths: HashSet<_> = files.charts.iter().collect();
    assert_eq!(paths.len(), files.charts.len());

    let svg_on_disk = std::fs::read_dir(&config.output_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map_or(false, |x| x == "svg"))
        .count();
    assert_eq!(svg_on_disk, report.charts.len());

    let html = std::fs::read_to_string(&files.html).unwrap();
    assert!(html.contains("Findings"));
    assert!(html.contains("identity mode"));
    assert!(html.contains("<svg"));

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&files.json).unwrap()).unwrap();
    assert!(json.get("metadata").is_some());
    assert_eq!(json["classifier"]["status"], "completed");
    assert_eq!(json["regression"]["status"], "completed");
    assert!(json["narrative"].as_array().map_or(false, |a| !a.is_empty()));
}

#[test]
fn test_same_seed_gives_same_report() {
    let dir = TempDir::new().unwrap();
    let mut config = quick_config(&dir);
    config.charts = false;
    let df = create_small_wine_dataframe();

    let a = generate_report(&df, &config).unwrap();
    let b = generate_report(&df, &config).unwrap();
    let (ca, cb) = (a.classifier.completed().unwrap(), b.classifier.completed().unwrap());
    assert_eq!(ca.importance.top(), cb.importance.top());
    assert_eq!(ca.mean_accuracy, cb.mean_accuracy);
}

#[test]
fn test_skip_models_marks_sections_skipped() {
    let dir = TempDir::new().unwrap();
    let mut config = quick_config(&dir);
    config.skip_models = true;
    config.charts = false;

    let report = generate_report(&create_small_wine_dataframe(), &config).unwrap();
    assert!(matches!(report.classifier, Section::Skipped(_)));
    assert!(matches!(report.regression, Section::Skipped(_)));
    assert!(report.correlations.completed().is_some());
    assert!(report.charts.is_empty());
}

#[test]
fn test_constant_column_skips_correlation_but_keeps_report() {
    let dir = TempDir::new().unwrap();
    let config = quick_config(&dir);
    let df = with_constant_column(&create_small_wine_dataframe(), "citric_acid", 0.3);

    let report = generate_report(&df, &config).unwrap();
    let reason = report.correlations.skip_reason().unwrap();
    assert!(reason.contains("citric_acid"), "reason: {}", reason);

    // The heatmap cannot be drawn; the rest of the gallery can
    assert!(!report.chart_notes.is_empty());
    assert!(!report.charts.is_empty());

    let files = write_report(&report, &config.output_dir).unwrap();
    let html = std::fs::read_to_string(files.html).unwrap();
    assert!(html.contains("Skipped"));
}

#[test]
fn test_natural_log_mode_flows_into_report() {
    let dir = TempDir::new().unwrap();
    let mut config = quick_config(&dir);
    config.log_mode = LogTransform::Natural;
    config.skip_models = true;
    config.charts = false;

    let report = generate_report(&create_small_wine_dataframe(), &config).unwrap();
    let gains = report.log_gains.completed().unwrap();
    assert_eq!(gains.len(), 2);
    assert!(gains.iter().any(|g| g.raw_correlation != g.log_correlation));
}

#[derive(Default)]
struct Recorder {
    started: Vec<Stage>,
    finished: Vec<&'static str>,
    charts_seen: usize,
}

impl StageObserver for Recorder {
    fn started(&mut self, stage: Stage, _config: &ReportConfig) {
        self.started.push(stage);
    }
    fn derived(&mut self, _df: &polars::prelude::DataFrame) {
        self.finished.push("derived");
    }
    fn summarized(&mut self, _summary: &winesight::pipeline::TableSummary) {
        self.finished.push("summarized");
    }
    fn charted(&mut self, charts: &[Chart], _notes: &[String]) {
        self.finished.push("charted");
        self.charts_seen = charts.len();
    }
}

#[test]
fn test_observed_run_visits_every_stage_in_order() {
    let dir = TempDir::new().unwrap();
    let config = quick_config(&dir);
    let df = create_small_wine_dataframe();

    let mut recorder = Recorder::default();
    let observed = generate_report_with(&df, &config, &mut recorder).unwrap();
    assert_eq!(
        recorder.started,
        vec![
            Stage::Derive,
            Stage::Summary,
            Stage::Correlation,
            Stage::Models,
            Stage::Charts
        ]
    );
    assert_eq!(recorder.finished, vec!["derived", "summarized", "charted"]);
    assert_eq!(recorder.charts_seen, observed.charts.len());

    let plain = generate_report(&df, &config).unwrap();
    let names = |r: &winesight::report::Report| -> Vec<String> {
        r.charts.iter().map(|c| c.name.clone()).collect()
    };
    assert_eq!(names(&observed), names(&plain));
    assert_eq!(
        observed.classifier.completed().unwrap().mean_accuracy,
        plain.classifier.completed().unwrap().mean_accuracy
    );
}
