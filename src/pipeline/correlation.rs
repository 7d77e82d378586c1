//! Pearson correlation over the numeric wine columns

use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::schema::{numeric_values, Measure, NumericColumn};
use crate::error::{AnalysisError, Result};

/// Represents a correlated pair of columns
#[derive(Debug, Clone, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Variable ordering for the correlation heatmap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatmapOrder {
    /// Table order
    #[default]
    Original,
    /// Alphabetical by column name
    Alphabetical,
    /// Descending absolute correlation with quality, quality first
    Quality,
}

impl std::fmt::Display for HeatmapOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeatmapOrder::Original => write!(f, "original"),
            HeatmapOrder::Alphabetical => write!(f, "alphabetical"),
            HeatmapOrder::Quality => write!(f, "quality"),
        }
    }
}

impl std::str::FromStr for HeatmapOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "original" => Ok(HeatmapOrder::Original),
            "alphabetical" | "alphabet" => Ok(HeatmapOrder::Alphabetical),
            "quality" => Ok(HeatmapOrder::Quality),
            _ => Err(format!(
                "Unknown heatmap order: '{}'. Use 'original', 'alphabetical' or 'quality'.",
                s
            )),
        }
    }
}

/// Full symmetric correlation matrix with unit diagonal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, column: NumericColumn) -> Option<usize> {
        self.columns.iter().position(|&c| c == column)
    }

    pub fn get(&self, a: NumericColumn, b: NumericColumn) -> Option<f64> {
        Some(self.values[self.index_of(a)?][self.index_of(b)?])
    }

    /// Correlation of every other column with `target`, strongest first
    pub fn correlations_with(&self, target: NumericColumn) -> Vec<(NumericColumn, f64)> {
        let Some(t) = self.index_of(target) else {
            return Vec::new();
        };
        let mut out: Vec<(NumericColumn, f64)> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != t)
            .map(|(i, &c)| (c, self.values[t][i]))
            .collect();
        out.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        out
    }

    /// Upper-triangle pairs, strongest absolute correlation first
    pub fn pairs(&self) -> Vec<CorrelatedPair> {
        let n = self.len();
        let mut pairs: Vec<CorrelatedPair> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .map(|(i, j)| CorrelatedPair {
                feature1: self.columns[i].column_name().to_string(),
                feature2: self.columns[j].column_name().to_string(),
                correlation: self.values[i][j],
            })
            .collect();

        pairs.sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));
        pairs
    }

    /// Same matrix with rows and columns permuted to `order`
    pub fn reordered(&self, order: HeatmapOrder) -> CorrelationMatrix {
        let mut idx: Vec<usize> = (0..self.len()).collect();
        match order {
            HeatmapOrder::Original => {}
            HeatmapOrder::Alphabetical => {
                idx.sort_by_key(|&i| self.columns[i].column_name());
            }
            HeatmapOrder::Quality => {
                if let Some(q) = self.index_of(NumericColumn::Quality) {
                    idx.sort_by(|&a, &b| {
                        let ka = if a == q { f64::INFINITY } else { self.values[q][a].abs() };
                        let kb = if b == q { f64::INFINITY } else { self.values[q][b].abs() };
                        kb.total_cmp(&ka)
                    });
                }
            }
        }

        CorrelationMatrix {
            columns: idx.iter().map(|&i| self.columns[i]).collect(),
            values: idx
                .iter()
                .map(|&i| idx.iter().map(|&j| self.values[i][j]).collect())
                .collect(),
        }
    }
}

/// Pearson correlation of two equally long slices using Welford's algorithm.
///
/// Returns `None` when either side has zero variance or the lengths differ.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }

    let mut count = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (&a, &b) in x.iter().zip(y.iter()) {
        count += 1.0;
        let dx = a - mean_x;
        let dy = b - mean_y;
        mean_x += dx / count;
        mean_y += dy / count;
        var_x += dx * (a - mean_x);
        var_y += dy * (b - mean_y);
        cov_xy += dx * (b - mean_y);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov_xy / (var_x.sqrt() * var_y.sqrt()))
}

/// Standardize one column so that `z^T z` over all columns gives correlations.
fn standardize_for_correlation(name: &str, values: &[f64]) -> Result<Vec<f64>> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    let std = (ss / n).sqrt();

    // Summation error can leave a constant column with a tiny nonzero spread
    let constant = values.iter().all(|&v| v == values[0]);
    if constant || std == 0.0 || !std.is_finite() {
        return Err(AnalysisError::degenerate(
            name,
            "has zero variance; correlation is undefined",
        ));
    }

    let scale = 1.0 / (n.sqrt() * std);
    Ok(values.iter().map(|v| (v - mean) * scale).collect())
}

/// Compute the correlation matrix of `columns` using matrix operations.
///
/// Algorithm:
/// 1. Standardize each column: z = (x - mean) / (std * sqrt(n))
/// 2. R = Z^T * Z
///
/// A constant column is a `DegenerateInput` error, never a NaN entry.
pub fn correlation_matrix(df: &DataFrame, columns: &[NumericColumn]) -> Result<CorrelationMatrix> {
    let n_cols = columns.len();
    let n_rows = df.height();

    if n_rows < 2 {
        return Err(AnalysisError::Data(format!(
            "Correlation needs at least 2 rows, table has {}",
            n_rows
        )));
    }

    let standardized: Vec<Vec<f64>> = columns
        .par_iter()
        .map(|&col| {
            let values = numeric_values(df, col)?;
            standardize_for_correlation(col.column_name(), &values)
        })
        .collect::<Result<_>>()?;

    let mut z = Mat::<f64>::zeros(n_rows, n_cols);
    for (col_idx, col_data) in standardized.iter().enumerate() {
        for (row_idx, &val) in col_data.iter().enumerate() {
            z[(row_idx, col_idx)] = val;
        }
    }

    let r = z.transpose() * &z;

    // Mirror the upper triangle so symmetry is exact
    let mut values = vec![vec![0.0; n_cols]; n_cols];
    for i in 0..n_cols {
        values[i][i] = 1.0;
        for j in (i + 1)..n_cols {
            let c = r[(i, j)].clamp(-1.0, 1.0);
            values[i][j] = c;
            values[j][i] = c;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}

/// Correlation matrix of the eleven measures plus quality.
pub fn base_correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    correlation_matrix(df, &NumericColumn::base_columns())
}

/// Change in correlation with quality from using the log column instead of the raw one
#[derive(Debug, Clone, Serialize)]
pub struct LogCorrelationGain {
    pub measure: Measure,
    pub raw_correlation: f64,
    pub log_correlation: f64,
    /// Relative change of |r| in percent; `None` when the raw correlation is exactly zero
    pub percent_change: Option<f64>,
}

/// Percent change from `|raw|` to `|logged|`
fn relative_change(raw: f64, logged: f64) -> Option<f64> {
    (raw != 0.0).then(|| (logged.abs() - raw.abs()) / raw.abs() * 100.0)
}

/// Compare raw vs log columns for chlorides and free sulfur dioxide.
pub fn log_correlation_gains(df: &DataFrame) -> Result<Vec<LogCorrelationGain>> {
    let quality = numeric_values(df, NumericColumn::Quality)?;

    [
        (Measure::Chlorides, NumericColumn::LogChlorides),
        (Measure::FreeSulfurDioxide, NumericColumn::LogFreeSulfurDioxide),
    ]
    .into_iter()
    .map(|(measure, log_col)| {
        let raw = numeric_values(df, measure.into())?;
        let logged = numeric_values(df, log_col)?;

        let raw_r = pearson(&raw, &quality).ok_or_else(|| {
            AnalysisError::degenerate(measure.column_name(), "has zero variance")
        })?;
        let log_r = pearson(&logged, &quality).ok_or_else(|| {
            AnalysisError::degenerate(log_col.column_name(), "has zero variance")
        })?;

        Ok(LogCorrelationGain {
            measure,
            raw_correlation: raw_r,
            log_correlation: log_r,
            percent_change: relative_change(raw_r, log_r),
        })
    })
    .collect()
}
