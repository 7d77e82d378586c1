//! Self-contained HTML document with inline SVG charts

use super::narrative::{narrative, strongest_quality_correlate};
use super::{Report, Section};
use crate::model::ImportanceRanking;
use crate::pipeline::LogTransform;

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 1100px; margin: 2em auto; color: #222; }
h1 { color: #722f37; }
h2 { border-bottom: 2px solid #722f37; padding-bottom: 0.2em; margin-top: 2em; }
table { border-collapse: collapse; margin: 1em 0; }
th, td { border: 1px solid #ccc; padding: 0.3em 0.7em; text-align: right; }
th:first-child, td:first-child { text-align: left; }
th { background: #f3ecec; }
.note { background: #fff7e0; border-left: 4px solid #e0a800; padding: 0.5em 1em; }
.meta { color: #666; font-size: 0.9em; }
figure { margin: 1.5em 0; }
figcaption { color: #555; font-size: 0.9em; }
"#;

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut html = String::from("<table>\n<tr>");
    for h in header {
        html.push_str(&format!("<th>{}</th>", escape(h)));
    }
    html.push_str("</tr>\n");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
    html
}

fn note(text: &str) -> String {
    format!("<p class=\"note\">{}</p>\n", escape(text))
}

fn f3(v: f64) -> String {
    format!("{:.3}", v)
}

fn summary_section(report: &Report) -> String {
    let s = &report.summary;
    let mut html = String::from("<h2>Descriptive statistics</h2>\n");
    let rows: Vec<Vec<String>> = s
        .columns
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                f3(c.min),
                f3(c.q1),
                f3(c.median),
                f3(c.mean),
                f3(c.q3),
                f3(c.max),
                f3(c.std_dev),
            ]
        })
        .collect();
    html.push_str(&table(
        &["Column", "Min", "Q1", "Median", "Mean", "Q3", "Max", "SD"],
        &rows,
    ));

    html.push_str("<h3>Quality scores</h3>\n");
    let rows: Vec<Vec<String>> = s
        .quality
        .counts
        .iter()
        .map(|(score, count)| {
            vec![
                score.to_string(),
                count.to_string(),
                format!("{:.1}%", *count as f64 / s.rows.max(1) as f64 * 100.0),
            ]
        })
        .collect();
    html.push_str(&table(&["Score", "Wines", "Share"], &rows));

    for counts in &s.categories {
        html.push_str(&format!("<h3>{}</h3>\n", escape(counts.column.label())));
        let rows: Vec<Vec<String>> = counts
            .counts
            .iter()
            .map(|(level, n)| vec![level.clone(), n.to_string()])
            .collect();
        html.push_str(&table(&["Level", "Wines"], &rows));
    }
    html
}

fn correlation_section(report: &Report) -> String {
    let mut html = String::from("<h2>Correlation</h2>\n");
    match &report.correlations {
        Section::Completed(findings) => {
            let rows: Vec<Vec<String>> = findings
                .with_quality
                .iter()
                .map(|(c, r)| vec![c.label().to_string(), f3(*r)])
                .collect();
            html.push_str(&table(&["Column", "r with quality"], &rows));

            let rows: Vec<Vec<String>> = findings
                .strongest_pairs
                .iter()
                .map(|p| vec![p.feature1.clone(), p.feature2.clone(), f3(p.correlation)])
                .collect();
            html.push_str("<h3>Strongest feature pairs</h3>\n");
            html.push_str(&table(&["Feature", "Feature", "r"], &rows));
        }
        Section::Skipped(reason) => html.push_str(&note(&format!("Skipped: {}", reason))),
    }

    html.push_str("<h3>Log-transformed columns</h3>\n");
    if report.config.log_mode == LogTransform::Identity {
        html.push_str(&note(
            "Log columns are computed in identity mode: they hold the raw values, not logarithms.",
        ));
    }
    match &report.log_gains {
        Section::Completed(gains) => {
            let rows: Vec<Vec<String>> = gains
                .iter()
                .map(|g| {
                    vec![
                        g.measure.label().to_string(),
                        f3(g.raw_correlation),
                        f3(g.log_correlation),
                        g.percent_change
                            .map(|p| format!("{:+.1}%", p))
                            .unwrap_or_else(|| "n/a".to_string()),
                    ]
                })
                .collect();
            html.push_str(&table(&["Measure", "r (raw)", "r (log)", "Change"], &rows));
        }
        Section::Skipped(reason) => html.push_str(&note(&format!("Skipped: {}", reason))),
    }
    html
}

fn importance(ranking: &ImportanceRanking) -> String {
    let rows: Vec<Vec<String>> = ranking
        .entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            vec![
                (i + 1).to_string(),
                e.measure.label().to_string(),
                format!("{:.1}", e.score),
                format!("{:.4}", e.raw),
            ]
        })
        .collect();
    table(&["Rank", "Measure", "Importance (0-100)", "Raw"], &rows)
}

fn model_section(report: &Report) -> String {
    let mut html = String::from("<h2>Models</h2>\n");
    let m = &report.config.model;
    html.push_str(&format!(
        "<p class=\"meta\">{}-fold cross-validation, seed {}.</p>\n",
        m.folds, m.seed
    ));

    html.push_str("<h3>Random forest (quality as class)</h3>\n");
    match &report.classifier {
        Section::Completed(c) => {
            let mut rows: Vec<Vec<String>> = c
                .folds
                .iter()
                .map(|f| {
                    vec![
                        f.fold.to_string(),
                        f.n_train.to_string(),
                        f.n_test.to_string(),
                        f3(f.accuracy),
                        f3(f.kappa),
                    ]
                })
                .collect();
            rows.push(vec![
                "Mean".into(),
                String::new(),
                String::new(),
                f3(c.mean_accuracy),
                f3(c.mean_kappa),
            ]);
            html.push_str(&table(&["Fold", "Train", "Test", "Accuracy", "Kappa"], &rows));
            let oob = c.oob_accuracy.map(f3).unwrap_or_else(|| "n/a".into());
            html.push_str(&format!(
                "<p class=\"meta\">{} trees, {} candidate features per split, out-of-bag accuracy {}.</p>\n",
                c.n_trees, c.mtry, oob
            ));
            html.push_str(&importance(&c.importance));
        }
        Section::Skipped(reason) => html.push_str(&note(&format!("Skipped: {}", reason))),
    }

    html.push_str("<h3>Linear regression (quality as score)</h3>\n");
    match &report.regression {
        Section::Completed(r) => {
            let na = || "n/a".to_string();
            let mut rows: Vec<Vec<String>> = r
                .folds
                .iter()
                .map(|f| {
                    vec![
                        f.fold.to_string(),
                        f.n_train.to_string(),
                        f.n_test.to_string(),
                        f3(f.rmse),
                        f.r_squared.map(f3).unwrap_or_else(na),
                        f3(f.mae),
                    ]
                })
                .collect();
            rows.push(vec![
                "Mean".into(),
                String::new(),
                String::new(),
                f3(r.mean_rmse),
                r.mean_r_squared.map(f3).unwrap_or_else(na),
                f3(r.mean_mae),
            ]);
            html.push_str(&table(&["Fold", "Train", "Test", "RMSE", "R²", "MAE"], &rows));

            let mut rows = vec![vec!["(intercept)".to_string(), f3(r.intercept)]];
            rows.extend(
                r.coefficients
                    .iter()
                    .map(|(m, b)| vec![m.label().to_string(), f3(*b)]),
            );
            html.push_str(&table(&["Term", "Coefficient (standardized)"], &rows));
            html.push_str(&importance(&r.importance));
        }
        Section::Skipped(reason) => html.push_str(&note(&format!("Skipped: {}", reason))),
    }
    html
}

fn chart_section(report: &Report) -> String {
    let mut html = String::from("<h2>Charts</h2>\n");
    if !report.config.charts {
        html.push_str(&note("Chart rendering was disabled for this run."));
        return html;
    }
    for chart in &report.charts {
        html.push_str(&format!(
            "<figure id=\"{}\">\n{}\n<figcaption>{}</figcaption>\n</figure>\n",
            escape(&chart.name),
            chart.svg,
            escape(&chart.title)
        ));
    }
    for n in &report.chart_notes {
        html.push_str(&note(n));
    }
    html
}

/// Render the complete report as one HTML document.
pub fn render_html(report: &Report) -> String {
    let title = format!(
        "Wine quality analysis: {}",
        report
            .config
            .input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    );

    let mut html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<h1>{}</h1>\n",
        escape(&title),
        STYLE,
        escape(&title)
    );
    html.push_str(&format!(
        "<p class=\"meta\">{} rows, log mode {}, heatmap order {}, winesight {}</p>\n",
        report.summary.rows,
        report.config.log_mode,
        report.config.heatmap_order,
        env!("CARGO_PKG_VERSION")
    ));

    html.push_str("<h2>Findings</h2>\n");
    if let Some((column, r)) = strongest_quality_correlate(report) {
        html.push_str(&format!(
            "<p><strong>Strongest correlate of quality:</strong> {} (r = {:.3})</p>\n",
            escape(column.label()),
            r
        ));
    }
    for paragraph in narrative(report) {
        html.push_str(&format!("<p>{}</p>\n", escape(&paragraph)));
    }
    for (section, reason) in report.skipped_sections() {
        html.push_str(&note(&format!("{} skipped: {}", section, reason)));
    }

    html.push_str(&summary_section(report));
    html.push_str(&correlation_section(report));
    html.push_str(&model_section(report));
    html.push_str(&chart_section(report));
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_table_escapes_cells() {
        let html = table(&["A"], &[vec!["<x>".to_string()]]);
        assert!(html.contains("<td>&lt;x&gt;</td>"));
    }
}
