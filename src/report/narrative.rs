//! Generated discussion of the findings

use super::Report;
use crate::pipeline::{LogTransform, Measure, NumericColumn};

fn direction(r: f64) -> &'static str {
    if r >= 0.0 {
        "positively"
    } else {
        "negatively"
    }
}

fn strength(r: f64) -> &'static str {
    match r.abs() {
        a if a >= 0.7 => "strongly",
        a if a >= 0.4 => "moderately",
        a if a >= 0.2 => "weakly",
        _ => "barely",
    }
}

fn dataset_paragraph(report: &Report) -> String {
    let q = &report.summary.quality;
    let mut text = format!("The table holds {} wines", report.summary.rows);
    if let (Some(lo), Some(hi)) = (q.min_score(), q.max_score()) {
        text.push_str(&format!(" rated between {} and {}", lo, hi));
    }
    text.push('.');

    if let Some(mode) = q.mode() {
        let count = q.counts.get(&mode).copied().unwrap_or(0);
        let share = count as f64 / report.summary.rows.max(1) as f64 * 100.0;
        text.push_str(&format!(
            " The most common score is {} ({} wines, {:.1}%), so most wines sit in the middle of the scale.",
            mode, count, share
        ));
    }

    if let Some(alcohol) = report.summary.column(Measure::Alcohol.into()) {
        text.push_str(&format!(
            " Alcohol averages {:.2}% vol (median {:.2}, range {:.1} to {:.1}).",
            alcohol.mean, alcohol.median, alcohol.min, alcohol.max
        ));
    }
    if let Some(sugar) = report.summary.column(Measure::ResidualSugar.into()) {
        if sugar.mean > sugar.median {
            text.push_str(&format!(
                " Residual sugar is right-skewed: its mean ({:.2}) sits above its median ({:.2}).",
                sugar.mean, sugar.median
            ));
        }
    }
    text
}

fn correlation_paragraph(report: &Report) -> Option<String> {
    let findings = report.correlations.completed()?;
    let mut ranked = findings.with_quality.iter();
    let &(first, r1) = ranked.next()?;

    let mut text = format!(
        "Quality is {} {} correlated with {} (r = {:.3})",
        strength(r1),
        direction(r1),
        first.label().to_lowercase(),
        r1
    );
    let runners: Vec<String> = ranked
        .take(2)
        .map(|(c, r)| format!("{} (r = {:.3})", c.label().to_lowercase(), r))
        .collect();
    if !runners.is_empty() {
        text.push_str(&format!(", followed by {}", runners.join(" and ")));
    }
    text.push('.');

    if let Some(pair) = findings.strongest_pairs.first() {
        text.push_str(&format!(
            " Among the measures themselves, {} and {} are the most closely related (r = {:.3}).",
            pair.feature1, pair.feature2, pair.correlation
        ));
    }
    Some(text)
}

fn log_paragraph(report: &Report) -> Option<String> {
    let gains = report.log_gains.completed()?;
    if report.config.log_mode == LogTransform::Identity {
        return Some(
            "The log chlorides and log free SO₂ columns are stored without a transform in this run \
             (identity mode), so they repeat the raw columns and show no gain over them. Rerun with \
             the natural log mode to measure the effect of the transform."
                .to_string(),
        );
    }

    let parts: Vec<String> = gains
        .iter()
        .map(|g| match g.percent_change {
            Some(change) => format!(
                "{} changes |r| with quality by {:+.1}% ({:.3} to {:.3})",
                g.measure.label().to_lowercase(),
                change,
                g.raw_correlation,
                g.log_correlation
            ),
            None => format!(
                "{} moves r with quality from zero to {:.3}",
                g.measure.label().to_lowercase(),
                g.log_correlation
            ),
        })
        .collect();
    Some(format!("Taking the natural log of {}.", parts.join("; of ")))
}

fn model_paragraph(report: &Report) -> Option<String> {
    let mut sentences = Vec::new();
    let forest_top = report.classifier.completed().and_then(|c| {
        sentences.push(format!(
            "A {}-tree random forest predicting the quality class reaches a mean accuracy of {:.3} \
             (kappa {:.3}) over {} folds.",
            c.n_trees,
            c.mean_accuracy,
            c.mean_kappa,
            c.folds.len()
        ));
        c.importance.top()
    });
    let linear_top = report.regression.completed().and_then(|r| {
        let r2 = r
            .mean_r_squared
            .map(|v| format!("{:.3}", v))
            .unwrap_or_else(|| "n/a".to_string());
        sentences.push(format!(
            "Linear regression on standardized measures gives a held-out RMSE of {:.3} and R² of {}.",
            r.mean_rmse, r2
        ));
        r.importance.top()
    });

    match (forest_top, linear_top) {
        (Some(a), Some(b)) if a == b => sentences.push(format!(
            "Both models rank {} as the most important variable.",
            a.label().to_lowercase()
        )),
        (a, b) => {
            if let Some(a) = a {
                sentences.push(format!(
                    "The forest relies most on {}.",
                    a.label().to_lowercase()
                ));
            }
            if let Some(b) = b {
                sentences.push(format!(
                    "The regression weights {} most heavily.",
                    b.label().to_lowercase()
                ));
            }
        }
    }

    (!sentences.is_empty()).then(|| sentences.join(" "))
}

/// Paragraphs of discussion, in report order. Skipped sections contribute
/// nothing; the document lists them separately.
pub fn narrative(report: &Report) -> Vec<String> {
    let mut paragraphs = vec![dataset_paragraph(report)];
    paragraphs.extend(correlation_paragraph(report));
    paragraphs.extend(log_paragraph(report));
    paragraphs.extend(model_paragraph(report));
    paragraphs
}

/// Strongest correlate of quality, if the correlation section ran
pub fn strongest_quality_correlate(report: &Report) -> Option<(NumericColumn, f64)> {
    report
        .correlations
        .completed()
        .and_then(|f| f.with_quality.first().copied())
}
