//! Winesight: Wine Quality Analysis CLI
//!
//! Reads a wine table and writes an exploratory-analysis report
//! (HTML document, JSON summary and SVG charts).

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::ProgressBar;
use polars::prelude::DataFrame;

use winesight::charts::Chart;
use winesight::cli::Cli;
use winesight::model::{ClassifierReport, RegressionReport};
use winesight::pipeline::{load_wine_table, table_stats, LogCorrelationGain, TableSummary};
use winesight::report::{
    display_correlations, display_dataset_summary, display_log_gains, display_models,
    generate_report_with, write_report, CorrelationFindings, ReportConfig, Section, Stage,
    StageObserver,
};
use winesight::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_info, print_step_header, print_step_time, print_success, print_warning,
};

/// Prints numbered steps, spinners and timings as the report stages run
struct ConsoleProgress {
    step_start: Instant,
    spinner: Option<ProgressBar>,
}

impl ConsoleProgress {
    fn new() -> Self {
        Self {
            step_start: Instant::now(),
            spinner: None,
        }
    }

    fn step(&mut self, num: u8, title: &str) {
        print_step_header(num, title);
        self.step_start = Instant::now();
    }
}

impl StageObserver for ConsoleProgress {
    fn started(&mut self, stage: Stage, config: &ReportConfig) {
        match stage {
            // Step 1 is already open from loading
            Stage::Derive => self.spinner = Some(create_spinner("Deriving features...")),
            Stage::Summary => self.step(2, "Descriptive Statistics"),
            Stage::Correlation => self.step(3, "Correlation Analysis"),
            Stage::Models => {
                self.step(4, "Cross-validated Models");
                if config.skip_models {
                    print_info("Modeling disabled (--skip-models)");
                } else {
                    self.spinner = Some(create_spinner(&format!(
                        "Fitting random forest ({} trees) and linear regression over {} folds...",
                        config.model.trees, config.model.folds
                    )));
                }
            }
            Stage::Charts => {
                self.step(5, "Charts");
                if config.charts {
                    self.spinner = Some(create_spinner("Rendering charts..."));
                } else {
                    print_info("Chart rendering disabled (--no-charts)");
                }
            }
        }
    }

    fn derived(&mut self, df: &DataFrame) {
        if let Some(spinner) = self.spinner.take() {
            finish_with_success(&spinner, "Features derived");
        }
        let (rows, cols, memory_mb) = table_stats(df);
        println!("\n    {} Dataset Statistics:", style("✧").cyan());
        println!("      Rows: {}", rows);
        println!("      Columns: {} (after derivation)", cols);
        println!("      Estimated memory: {:.2} MB", memory_mb);
        print_step_time(self.step_start.elapsed());
    }

    fn summarized(&mut self, summary: &TableSummary) {
        display_dataset_summary(summary);
        print_step_time(self.step_start.elapsed());
    }

    fn correlated(
        &mut self,
        findings: &Section<CorrelationFindings>,
        gains: &Section<Vec<LogCorrelationGain>>,
    ) {
        match findings {
            Section::Completed(findings) => display_correlations(findings),
            Section::Skipped(reason) => print_warning(&format!("Correlation skipped: {}", reason)),
        }
        match gains {
            Section::Completed(gains) => display_log_gains(gains),
            Section::Skipped(reason) => {
                print_warning(&format!("Log-transform comparison skipped: {}", reason))
            }
        }
        print_step_time(self.step_start.elapsed());
    }

    fn modeled(&mut self, classifier: &Section<ClassifierReport>, regression: &Section<RegressionReport>) {
        if let Some(spinner) = self.spinner.take() {
            if classifier.completed().is_some() && regression.completed().is_some() {
                finish_with_success(&spinner, "Models fitted");
            } else {
                finish_with_warning(&spinner, "Some models could not be fitted");
            }
            display_models(classifier, regression);
        }
        print_step_time(self.step_start.elapsed());
    }

    fn charted(&mut self, charts: &[Chart], notes: &[String]) {
        if let Some(spinner) = self.spinner.take() {
            finish_with_success(&spinner, &format!("{} charts rendered", charts.len()));
        }
        for n in notes {
            print_warning(n);
        }
        print_step_time(self.step_start.elapsed());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.report_config();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // Step 1: Load; derivation follows inside the report run
    let mut progress = ConsoleProgress::new();
    progress.step(1, "Load Dataset");
    let spinner = create_spinner("Reading wine table...");
    let base = load_wine_table(&config.input)
        .with_context(|| format!("Failed to load {}", config.input.display()))?;
    finish_with_success(&spinner, "Dataset loaded");

    let report = generate_report_with(&base, &config, &mut progress)
        .context("Failed to analyze the wine table")?;

    // Step 6: Write report
    progress.step(6, "Write Report");
    let files = write_report(&report, &config.output_dir).with_context(|| {
        format!(
            "Failed to write report to {}",
            config.output_dir.display()
        )
    })?;
    print_success(&format!("HTML report: {}", files.html.display()));
    print_success(&format!("JSON summary: {}", files.json.display()));
    if !files.charts.is_empty() {
        print_success(&format!("{} SVG charts", files.charts.len()));
    }
    for (section, reason) in report.skipped_sections() {
        print_warning(&format!("{} skipped: {}", section, reason));
    }
    print_step_time(progress.step_start.elapsed());

    print_completion(&files.html);
    Ok(())
}
