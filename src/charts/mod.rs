//! Chart rendering - SVG documents drawn with plotters
//!
//! Every chart function takes the table, typed column selectors and an
//! explicit `ChartOptions`; there are no global rendering defaults.

pub mod boxplot;
pub mod heatmap;
pub mod histogram;
pub mod scatter;

pub use boxplot::box_plot;
pub use heatmap::correlation_heatmap;
pub use histogram::histogram;
pub use scatter::scatter;

use std::path::{Path, PathBuf};

use plotters::style::RGBColor;
use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::pipeline::{CategoryColumn, HeatmapOrder};

/// Font family used for every caption and label
pub(crate) const FONT: &str = "sans-serif";

/// Bar and point colour
pub(crate) const PRIMARY: RGBColor = RGBColor(114, 47, 55);

/// Colour of overlays (fit lines, mean marker)
pub(crate) const ACCENT: RGBColor = RGBColor(31, 119, 180);

/// Colour of quartile markers
pub(crate) const MUTED: RGBColor = RGBColor(120, 120, 120);

/// Rendering settings for one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    /// Caption; each chart kind falls back to a generated one
    pub title: Option<String>,
    /// Histogram bin count
    pub bins: usize,
    /// Log10-scale the x axis (histograms, scatter)
    pub log_scale: bool,
    /// Overlay quartile and mean markers on histograms
    pub quantile_markers: bool,
    /// Overlay a least-squares line on scatter plots
    pub fit_line: bool,
    /// Draw one panel per level of this category
    pub facet: Option<CategoryColumn>,
    /// Horizontal jitter for scatter points (in x units)
    pub jitter: f64,
    /// Variable ordering for heatmaps
    pub order: HeatmapOrder,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: None,
            bins: 30,
            log_scale: false,
            quantile_markers: false,
            fit_line: false,
            facet: None,
            jitter: 0.0,
            order: HeatmapOrder::Original,
        }
    }
}

impl ChartOptions {
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    pub fn with_log_scale(mut self, log_scale: bool) -> Self {
        self.log_scale = log_scale;
        self
    }

    pub fn with_quantile_markers(mut self) -> Self {
        self.quantile_markers = true;
        self
    }

    pub fn with_fit_line(mut self) -> Self {
        self.fit_line = true;
        self
    }

    pub fn with_facet(mut self, facet: CategoryColumn) -> Self {
        self.facet = Some(facet);
        self
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_order(mut self, order: HeatmapOrder) -> Self {
        self.order = order;
        self
    }

    pub(crate) fn title_or(&self, fallback: impl Into<String>) -> String {
        self.title.clone().unwrap_or_else(|| fallback.into())
    }
}

/// A rendered chart: a file-safe name plus the SVG document
#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    pub name: String,
    pub title: String,
    #[serde(skip)]
    pub svg: String,
}

impl Chart {
    pub(crate) fn new(name: impl Into<String>, title: String, svg: String) -> Self {
        Self {
            name: slug(&name.into()),
            title,
            svg,
        }
    }

    /// Write `<name>.svg` into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.svg", self.name));
        std::fs::write(&path, &self.svg)?;
        Ok(path)
    }
}

/// Lowercase, with anything other than letters and digits collapsed to `_`
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

pub(crate) fn chart_err<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::Chart(e.to_string())
}

/// Min and max of a slice, padded by `pad` of the span (or ±0.5 if flat)
pub(crate) fn padded_range(values: &[f64], pad: f64) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span == 0.0 {
        (min - 0.5, max + 0.5)
    } else {
        (min - span * pad, max + span * pad)
    }
}

/// log10 of each value; non-positive values cannot be placed on a log axis
pub(crate) fn log10_values(values: &[f64], column: &str) -> Result<Vec<f64>> {
    values
        .iter()
        .map(|&v| {
            if v > 0.0 {
                Ok(v.log10())
            } else {
                Err(AnalysisError::Chart(format!(
                    "Cannot place non-positive {} value {} on a log axis",
                    column, v
                )))
            }
        })
        .collect()
}
