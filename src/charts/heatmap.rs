//! Correlation heatmap

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{chart_err, Chart, ChartOptions, FONT};
use crate::error::{AnalysisError, Result};
use crate::pipeline::CorrelationMatrix;

const NEGATIVE: (f64, f64, f64) = (33.0, 102.0, 172.0);
const POSITIVE: (f64, f64, f64) = (178.0, 24.0, 43.0);

/// Diverging blue-white-red colour for a correlation in [-1, 1].
pub fn correlation_color(r: f64) -> RGBColor {
    let r = if r.is_finite() { r.clamp(-1.0, 1.0) } else { 0.0 };
    let (target, t) = if r < 0.0 { (NEGATIVE, -r) } else { (POSITIVE, r) };
    let mix = |end: f64| (255.0 + (end - 255.0) * t).round() as u8;
    RGBColor(mix(target.0), mix(target.1), mix(target.2))
}

/// Heatmap of `matrix` with rows and columns in `opts.order`.
///
/// Row 0 is drawn at the top; each cell carries its value to two decimals.
pub fn correlation_heatmap(matrix: &CorrelationMatrix, opts: &ChartOptions) -> Result<Chart> {
    if matrix.is_empty() {
        return Err(AnalysisError::Chart(
            "Cannot draw a heatmap of an empty correlation matrix".to_string(),
        ));
    }
    let ordered = matrix.reordered(opts.order);
    let n = ordered.len();
    let names: Vec<&str> = ordered.columns.iter().map(|c| c.column_name()).collect();
    let title = opts.title_or(format!("Correlation matrix ({} order)", opts.order));

    // Cell (i, j) is centred on x = j, y = n - 1 - i
    let label_at = |v: &f64| -> String {
        let i = v.round();
        if (v - i).abs() > 1e-6 || i < 0.0 || i as usize >= n {
            String::new()
        } else {
            names[i as usize].to_string()
        }
    };
    let row_label_at = |v: &f64| -> String {
        let i = v.round();
        if (v - i).abs() > 1e-6 || i < 0.0 || i as usize >= n {
            String::new()
        } else {
            names[n - 1 - i as usize].to_string()
        }
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (opts.width, opts.height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let extent = n as f64 - 0.5;
        let mut chart = ChartBuilder::on(&root)
            .caption(&title, (FONT, 22))
            .margin(12)
            .x_label_area_size(130)
            .y_label_area_size(140)
            .build_cartesian_2d(-0.5..extent, -0.5..extent)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&label_at)
            .y_label_formatter(&row_label_at)
            .x_label_style((FONT, 12).into_font().transform(FontTransform::Rotate90))
            .y_label_style((FONT, 12))
            .draw()
            .map_err(chart_err)?;

        let cells = (0..n).flat_map(|i| (0..n).map(move |j| (i, j)));
        chart
            .draw_series(cells.clone().map(|(i, j)| {
                let (x, y) = (j as f64, (n - 1 - i) as f64);
                Rectangle::new(
                    [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                    correlation_color(ordered.values[i][j]).filled(),
                )
            }))
            .map_err(chart_err)?;

        let centred = TextStyle::from((FONT, 11).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
        chart
            .draw_series(cells.map(|(i, j)| {
                let r = ordered.values[i][j];
                let style = if r.abs() > 0.6 {
                    centred.color(&WHITE)
                } else {
                    centred.color(&BLACK)
                };
                Text::new(format!("{:.2}", r), (j as f64, (n - 1 - i) as f64), style)
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    Ok(Chart::new(
        format!("correlation_heatmap_{}", opts.order),
        title,
        svg,
    ))
}
