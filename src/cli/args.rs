//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::model::{ModelConfig, DEFAULT_FOLDS, DEFAULT_SEED, DEFAULT_TREES};
use crate::pipeline::{HeatmapOrder, LogTransform};
use crate::report::ReportConfig;

/// Winesight - exploratory analysis report for wine quality data
#[derive(Parser, Debug, Clone)]
#[command(name = "winesight")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV with ',' or ';' separator, or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory for report.html, summary.json and the charts.
    /// Defaults to '<input_dir>/<stem>_report/'.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of cross-validation folds (at least 2)
    #[arg(long, default_value_t = DEFAULT_FOLDS, value_parser = validate_folds)]
    pub folds: usize,

    /// Number of trees in the random forest
    #[arg(long, default_value_t = DEFAULT_TREES, value_parser = validate_trees)]
    pub trees: usize,

    /// Seed for fold assignment and bootstrap sampling
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Features tried per split (default: floor(sqrt(11)) = 3)
    #[arg(long, value_parser = validate_mtry)]
    pub mtry: Option<usize>,

    /// How the log chlorides / log free SO2 columns are computed.
    /// "identity" keeps the raw values, "natural" applies ln.
    #[arg(long, default_value = "identity")]
    pub log_mode: LogTransform,

    /// Variable ordering of the correlation heatmap:
    /// "original", "alphabetical" or "quality" (by |r| with quality)
    #[arg(long, default_value = "original")]
    pub heatmap_order: HeatmapOrder,

    /// Skip the random forest and linear regression
    #[arg(long, default_value = "false")]
    pub skip_models: bool,

    /// Do not render charts
    #[arg(long, default_value = "false")]
    pub no_charts: bool,

    /// Chart width in pixels
    #[arg(long, default_value_t = 800, value_parser = validate_dimension)]
    pub width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = 600, value_parser = validate_dimension)]
    pub height: u32,
}

impl Cli {
    /// Output directory, derived from the input when not given.
    pub fn output_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let parent = self.input.parent().unwrap_or_else(|| Path::new("."));
            let stem = self
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("wine");
            parent.join(format!("{}_report", stem))
        })
    }

    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            input: self.input.clone(),
            output_dir: self.output_dir(),
            log_mode: self.log_mode,
            heatmap_order: self.heatmap_order,
            model: ModelConfig {
                folds: self.folds,
                trees: self.trees,
                mtry: self.mtry,
                seed: self.seed,
            },
            skip_models: self.skip_models,
            charts: !self.no_charts,
            width: self.width,
            height: self.height,
        }
    }
}

fn parse_usize(s: &str) -> Result<usize, String> {
    s.parse()
        .map_err(|_| format!("'{}' is not a valid whole number", s))
}

/// Validator for folds parameter
fn validate_folds(s: &str) -> Result<usize, String> {
    let value = parse_usize(s)?;
    if value < 2 {
        Err(format!("folds must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for trees parameter
fn validate_trees(s: &str) -> Result<usize, String> {
    let value = parse_usize(s)?;
    if value == 0 {
        Err("trees must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for mtry parameter (1..=11 measures)
fn validate_mtry(s: &str) -> Result<usize, String> {
    let value = parse_usize(s)?;
    if !(1..=11).contains(&value) {
        Err(format!("mtry must be between 1 and 11, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for chart width/height
fn validate_dimension(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid pixel size", s))?;
    if !(200..=4000).contains(&value) {
        Err(format!(
            "chart dimensions must be between 200 and 4000 pixels, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
