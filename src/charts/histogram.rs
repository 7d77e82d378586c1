//! Histogram of one numeric column

use plotters::prelude::*;
use polars::prelude::DataFrame;

use super::{chart_err, log10_values, padded_range, Chart, ChartOptions, ACCENT, FONT, MUTED, PRIMARY};
use crate::error::{AnalysisError, Result};
use crate::pipeline::{numeric_values, quantile, NumericColumn};

/// One histogram bar covering `[lo, hi)`
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Equal-width bins over the value range; the maximum lands in the last bin.
pub fn equal_width_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let (lo, hi) = padded_range(values, 0.0);
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|b| HistogramBin {
            lo: lo + b as f64 * width,
            hi: lo + (b + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Histogram of `column`, optionally on a log10 axis with quartile/mean markers.
pub fn histogram(df: &DataFrame, column: NumericColumn, opts: &ChartOptions) -> Result<Chart> {
    let raw = numeric_values(df, column)?;
    if raw.is_empty() {
        return Err(AnalysisError::Data(format!(
            "Column '{}' has no values to plot",
            column.column_name()
        )));
    }
    let values = if opts.log_scale {
        log10_values(&raw, column.column_name())?
    } else {
        raw
    };

    let bins = equal_width_bins(&values, opts.bins);
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(1) as f64 * 1.1;
    let x_lo = bins.first().map(|b| b.lo).unwrap_or(0.0);
    let x_hi = bins.last().map(|b| b.hi).unwrap_or(1.0);

    let title = opts.title_or(format!("Distribution of {}", column.label()));
    let x_desc = if opts.log_scale {
        format!("{} (log10 scale)", column.label())
    } else {
        column.label().to_string()
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (opts.width, opts.height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let log_scale = opts.log_scale;
        let tick = move |v: &f64| {
            if log_scale {
                format!("{:.3}", 10f64.powf(*v))
            } else {
                format!("{:.2}", v)
            }
        };

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, (FONT, 22))
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(x_lo..x_hi, 0f64..y_max)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x_desc.as_str())
            .y_desc("Count")
            .x_label_formatter(&tick)
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(bins.iter().map(|b| {
                Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], PRIMARY.mix(0.75).filled())
            }))
            .map_err(chart_err)?;

        if opts.quantile_markers {
            let mut sorted = values.clone();
            sorted.sort_by(|a, b| a.total_cmp(b));
            let mean = values.iter().sum::<f64>() / values.len() as f64;

            for p in [0.25, 0.5, 0.75] {
                let q = quantile(&sorted, p);
                chart
                    .draw_series(LineSeries::new(
                        vec![(q, 0.0), (q, y_max)],
                        MUTED.stroke_width(2),
                    ))
                    .map_err(chart_err)?;
            }

            chart
                .draw_series(LineSeries::new(
                    vec![(mean, 0.0), (mean, y_max)],
                    ACCENT.stroke_width(2),
                ))
                .map_err(chart_err)?
                .label("mean")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &ACCENT));

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(chart_err)?;
        }

        root.present().map_err(chart_err)?;
    }

    let name = if opts.log_scale {
        format!("histogram_{}_log10", column.column_name())
    } else {
        format!("histogram_{}", column.column_name())
    };
    Ok(Chart::new(name, title, svg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_width_bins_count_everything() {
        let values = [0.0, 0.5, 1.0, 1.5, 2.0];
        let bins = equal_width_bins(&values, 2);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 3);
    }

    #[test]
    fn test_constant_values_single_range() {
        let bins = equal_width_bins(&[3.0, 3.0, 3.0], 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }
}
