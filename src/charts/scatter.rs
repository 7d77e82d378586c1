//! Scatter plots, optionally jittered, fitted and faceted by a category

use plotters::coord::Shift;
use plotters::prelude::*;
use polars::prelude::DataFrame;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{chart_err, log10_values, padded_range, Chart, ChartOptions, ACCENT, FONT, PRIMARY};
use crate::error::{AnalysisError, Result};
use crate::pipeline::{category_labels, category_levels, numeric_values, NumericColumn};

/// Seed for jitter so repeated renders produce identical documents
const JITTER_SEED: u64 = 0x5CA7_7E12;

/// Least-squares line through `points` as (slope, intercept); `None` when x is constant.
pub fn least_squares(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for &(x, y) in points {
        sxy += (x - mean_x) * (y - mean_y);
        sxx += (x - mean_x) * (x - mean_x);
    }
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

struct Axes<'a> {
    x: (f64, f64),
    y: (f64, f64),
    x_desc: &'a str,
    y_desc: &'a str,
    log_x: bool,
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    caption: &str,
    caption_size: u32,
    points: &[(f64, f64)],
    axes: &Axes<'_>,
    fit_line: bool,
) -> Result<()> {
    let log_x = axes.log_x;
    let tick = move |v: &f64| {
        if log_x {
            format!("{:.3}", 10f64.powf(*v))
        } else {
            format!("{:.2}", v)
        }
    };

    let mut chart = ChartBuilder::on(area)
        .caption(caption, (FONT, caption_size))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(axes.x.0..axes.x.1, axes.y.0..axes.y.1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(axes.x_desc)
        .y_desc(axes.y_desc)
        .x_label_formatter(&tick)
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, PRIMARY.mix(0.45).filled())),
        )
        .map_err(chart_err)?;

    if fit_line {
        if let Some((slope, intercept)) = least_squares(points) {
            let (x0, x1) = axes.x;
            chart
                .draw_series(LineSeries::new(
                    vec![(x0, intercept + slope * x0), (x1, intercept + slope * x1)],
                    ACCENT.stroke_width(2),
                ))
                .map_err(chart_err)?;
        }
    }
    Ok(())
}

/// Scatter of `y` against `x`.
///
/// With `opts.facet` set, one panel is drawn per level of the category on
/// shared axes; levels with no rows still get an (empty) panel.
pub fn scatter(
    df: &DataFrame,
    x: NumericColumn,
    y: NumericColumn,
    opts: &ChartOptions,
) -> Result<Chart> {
    let raw_x = numeric_values(df, x)?;
    let ys = numeric_values(df, y)?;
    if raw_x.is_empty() {
        return Err(AnalysisError::Data(format!(
            "Column '{}' has no values to plot",
            x.column_name()
        )));
    }

    let mut xs = if opts.log_scale {
        log10_values(&raw_x, x.column_name())?
    } else {
        raw_x
    };
    if opts.jitter > 0.0 {
        let mut rng = StdRng::seed_from_u64(JITTER_SEED);
        for v in xs.iter_mut() {
            *v += rng.gen_range(-opts.jitter..=opts.jitter);
        }
    }

    let points: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
    let x_desc = if opts.log_scale {
        format!("{} (log10 scale)", x.label())
    } else {
        x.label().to_string()
    };
    let axes = Axes {
        x: padded_range(&xs, 0.03),
        y: padded_range(&ys, 0.05),
        x_desc: &x_desc,
        y_desc: y.label(),
        log_x: opts.log_scale,
    };

    let title = opts.title_or(format!("{} vs {}", y.label(), x.label()));
    let mut name = format!("scatter_{}_vs_{}", y.column_name(), x.column_name());

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (opts.width, opts.height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        match opts.facet {
            None => draw_panel(&root, &title, 22, &points, &axes, opts.fit_line)?,
            Some(facet) => {
                name.push_str(&format!("_by_{}", facet.column_name()));
                let labels = category_labels(df, facet)?;
                let levels: Vec<String> = match category_levels(facet) {
                    Some(levels) => levels.into_iter().map(str::to_string).collect(),
                    None => {
                        let mut observed = labels.clone();
                        observed.sort();
                        observed.dedup();
                        observed
                    }
                };

                let (top, body) = root.split_vertically(40);
                top.titled(&title, (FONT, 22)).map_err(chart_err)?;

                let cols = (levels.len() as f64).sqrt().ceil().max(1.0) as usize;
                let rows = levels.len().div_ceil(cols).max(1);
                let panels = body.split_evenly((rows, cols));

                for (level, panel) in levels.iter().zip(panels.iter()) {
                    let subset: Vec<(f64, f64)> = points
                        .iter()
                        .zip(&labels)
                        .filter(|(_, l)| *l == level)
                        .map(|(&p, _)| p)
                        .collect();
                    let caption = format!("{} = {} (n = {})", facet.label(), level, subset.len());
                    draw_panel(panel, &caption, 14, &subset, &axes, opts.fit_line)?;
                }
            }
        }

        root.present().map_err(chart_err)?;
    }

    Ok(Chart::new(name, title, svg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_least_squares_exact_line() {
        let points: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 2.0 * i as f64 + 1.0)).collect();
        let (slope, intercept) = least_squares(&points).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_least_squares_vertical_is_none() {
        assert!(least_squares(&[(1.0, 2.0), (1.0, 3.0)]).is_none());
        assert!(least_squares(&[(1.0, 2.0)]).is_none());
    }
}
