//! Console tables for the analysis results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use super::{CorrelationFindings, Section};
use crate::model::{ClassifierReport, ImportanceRanking, RegressionReport};
use crate::pipeline::{LogCorrelationGain, TableSummary};

fn print_heading(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        header
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn num(value: f64, decimals: usize) -> Cell {
    Cell::new(format!("{:.*}", decimals, value)).set_alignment(CellAlignment::Right)
}

/// Colour a correlation by strength
fn correlation_cell(r: f64) -> Cell {
    let color = if r.abs() >= 0.5 {
        Color::Red
    } else if r.abs() >= 0.3 {
        Color::Yellow
    } else {
        Color::White
    };
    num(r, 3).fg(color)
}

/// Descriptive statistics, quality distribution and category counts
pub fn display_dataset_summary(summary: &TableSummary) {
    print_heading("📋", "DESCRIPTIVE STATISTICS");

    let mut table = new_table(&["Column", "Min", "Q1", "Median", "Mean", "Q3", "Max", "SD"]);
    for c in &summary.columns {
        table.add_row(vec![
            Cell::new(&c.name),
            num(c.min, 3),
            num(c.q1, 3),
            num(c.median, 3),
            num(c.mean, 3).add_attribute(Attribute::Bold),
            num(c.q3, 3),
            num(c.max, 3),
            num(c.std_dev, 3),
        ]);
    }
    print_indented(&table);

    print_heading("🍷", "QUALITY DISTRIBUTION");
    let mode = summary.quality.mode();
    let mut table = new_table(&["Score", "Wines", "Share"]);
    for (&score, &count) in &summary.quality.counts {
        let share = count as f64 / summary.rows.max(1) as f64 * 100.0;
        let score_cell = Cell::new(score);
        table.add_row(vec![
            if Some(score) == mode {
                score_cell.fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                score_cell
            },
            Cell::new(count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", share)).set_alignment(CellAlignment::Right),
        ]);
    }
    print_indented(&table);

    for counts in &summary.categories {
        println!();
        println!(
            "      {} {}",
            style(counts.column.label()).yellow(),
            style(format!("({} levels)", counts.counts.len())).dim()
        );
        for (level, count) in &counts.counts {
            println!("        {} {:<18} {:>6}", style("•").dim(), level, count);
        }
    }
}

/// Correlations with quality and the strongest feature pairs
pub fn display_correlations(findings: &CorrelationFindings) {
    print_heading("🔗", "CORRELATION WITH QUALITY");

    let mut table = new_table(&["Column", "r"]);
    for (column, r) in &findings.with_quality {
        table.add_row(vec![Cell::new(column.label()), correlation_cell(*r)]);
    }
    print_indented(&table);

    if !findings.strongest_pairs.is_empty() {
        println!();
        println!("      {}", style("Strongest feature pairs").yellow());
        for pair in &findings.strongest_pairs {
            println!(
                "        {} {} ~ {} {}",
                style("•").dim(),
                pair.feature1,
                pair.feature2,
                style(format!("(r = {:.3})", pair.correlation)).dim()
            );
        }
    }
}

/// Raw vs log correlation with quality
pub fn display_log_gains(gains: &[LogCorrelationGain]) {
    print_heading("📐", "LOG TRANSFORM COMPARISON");

    let mut table = new_table(&["Measure", "r (raw)", "r (log)", "Change"]);
    for g in gains {
        table.add_row(vec![
            Cell::new(g.measure.label()),
            num(g.raw_correlation, 3),
            num(g.log_correlation, 3),
            Cell::new(
                g.percent_change
                    .map(|p| format!("{:+.1}%", p))
                    .unwrap_or_else(|| "n/a".to_string()),
            )
            .set_alignment(CellAlignment::Right),
        ]);
    }
    print_indented(&table);
}

fn importance_table(ranking: &ImportanceRanking) -> Table {
    let mut table = new_table(&["Rank", "Measure", "Importance"]);
    for (i, e) in ranking.entries.iter().enumerate() {
        let score = num(e.score, 1);
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(e.measure.label()),
            if i == 0 {
                score.fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                score
            },
        ]);
    }
    table
}

fn print_skipped(title: &str, reason: &str) {
    println!(
        "      {} {} {}",
        style("⚠").yellow(),
        style(format!("{} skipped:", title)).yellow(),
        style(reason).dim()
    );
}

/// Cross-validation metrics and importance of both models
pub fn display_models(
    classifier: &Section<ClassifierReport>,
    regression: &Section<RegressionReport>,
) {
    print_heading("🌲", "RANDOM FOREST (quality as class)");
    match classifier {
        Section::Completed(report) => {
            let mut table = new_table(&["Fold", "Train", "Test", "Accuracy", "Kappa"]);
            for f in &report.folds {
                table.add_row(vec![
                    Cell::new(f.fold),
                    Cell::new(f.n_train),
                    Cell::new(f.n_test),
                    num(f.accuracy, 3),
                    num(f.kappa, 3),
                ]);
            }
            table.add_row(vec![
                Cell::new("Mean").add_attribute(Attribute::Bold),
                Cell::new(""),
                Cell::new(""),
                num(report.mean_accuracy, 3).fg(Color::Cyan),
                num(report.mean_kappa, 3).fg(Color::Cyan),
            ]);
            print_indented(&table);
            println!();
            print_indented(&importance_table(&report.importance));
        }
        Section::Skipped(reason) => print_skipped("Random forest", reason),
    }

    print_heading("📈", "LINEAR REGRESSION (quality as score)");
    match regression {
        Section::Completed(report) => {
            let mut table = new_table(&["Fold", "Train", "Test", "RMSE", "R²", "MAE"]);
            for f in &report.folds {
                table.add_row(vec![
                    Cell::new(f.fold),
                    Cell::new(f.n_train),
                    Cell::new(f.n_test),
                    num(f.rmse, 3),
                    f.r_squared.map(|r| num(r, 3)).unwrap_or_else(|| Cell::new("n/a")),
                    num(f.mae, 3),
                ]);
            }
            table.add_row(vec![
                Cell::new("Mean").add_attribute(Attribute::Bold),
                Cell::new(""),
                Cell::new(""),
                num(report.mean_rmse, 3).fg(Color::Cyan),
                report
                    .mean_r_squared
                    .map(|r| num(r, 3).fg(Color::Cyan))
                    .unwrap_or_else(|| Cell::new("n/a")),
                num(report.mean_mae, 3).fg(Color::Cyan),
            ]);
            print_indented(&table);
            println!();
            print_indented(&importance_table(&report.importance));
        }
        Section::Skipped(reason) => print_skipped("Linear regression", reason),
    }
}
