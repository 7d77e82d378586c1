//! Descriptive statistics over the wine table

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use super::derive::{AlcoholCategory, QualityCategory, Sweetness};
use super::schema::{
    category_labels, numeric_values, quality_scores, CategoryColumn, NumericColumn,
};
use crate::error::{AnalysisError, Result};

/// Five-number summary plus mean and standard deviation of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: NumericColumn,
    pub name: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub mean: f64,
    pub q3: f64,
    pub max: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
}

/// Count of samples per level of a categorical column, in level order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCounts {
    pub column: CategoryColumn,
    pub counts: Vec<(String, usize)>,
}

impl CategoryCounts {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn count_of(&self, level: &str) -> usize {
        self.counts
            .iter()
            .find(|(l, _)| l == level)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

/// Frequency of each observed quality score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityDistribution {
    pub counts: BTreeMap<i64, usize>,
}

impl QualityDistribution {
    /// Most frequent score; ties go to the lower score.
    pub fn mode(&self) -> Option<i64> {
        self.counts
            .iter()
            .fold(None, |best: Option<(i64, usize)>, (&score, &n)| match best {
                Some((_, best_n)) if best_n >= n => best,
                _ => Some((score, n)),
            })
            .map(|(score, _)| score)
    }

    pub fn min_score(&self) -> Option<i64> {
        self.counts.keys().next().copied()
    }

    pub fn max_score(&self) -> Option<i64> {
        self.counts.keys().next_back().copied()
    }
}

/// Quantile by linear interpolation between order statistics.
///
/// `sorted` must be ascending and non-empty; `p` is in `[0, 1]`.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Summarize a slice of values under the given column identity.
pub fn summarize_values(column: NumericColumn, values: &[f64]) -> Result<ColumnSummary> {
    let name = column.column_name();
    if values.is_empty() {
        return Err(AnalysisError::Data(format!("Column '{}' is empty", name)));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std_dev = if n > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        (ss / (n - 1) as f64).sqrt()
    } else {
        0.0
    };

    Ok(ColumnSummary {
        column,
        name: name.to_string(),
        count: n,
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        mean,
        q3: quantile(&sorted, 0.75),
        max: sorted[n - 1],
        std_dev,
    })
}

/// Summaries for each requested numeric column, in request order.
pub fn describe(df: &DataFrame, columns: &[NumericColumn]) -> Result<Vec<ColumnSummary>> {
    columns
        .par_iter()
        .map(|&col| {
            let values = numeric_values(df, col)?;
            summarize_values(col, &values)
        })
        .collect()
}

/// Known level order of a categorical column, `None` when data-dependent.
pub fn category_levels(column: CategoryColumn) -> Option<Vec<&'static str>> {
    match column {
        CategoryColumn::Sweetness => Some(Sweetness::LEVELS.iter().map(|s| s.label()).collect()),
        CategoryColumn::AlcoholCategory => {
            Some(AlcoholCategory::LEVELS.iter().map(|a| a.label()).collect())
        }
        CategoryColumn::QualityCategory => {
            Some(QualityCategory::LEVELS.iter().map(|q| q.label()).collect())
        }
        CategoryColumn::DensityBucket => None,
    }
}

/// Frequency of each level. Fixed-level columns list every level, including
/// empty ones; density buckets list observed buckets in ascending order.
pub fn category_counts(df: &DataFrame, column: CategoryColumn) -> Result<CategoryCounts> {
    let labels = category_labels(df, column)?;
    let mut observed: BTreeMap<String, usize> = BTreeMap::new();
    for label in labels {
        *observed.entry(label).or_insert(0) += 1;
    }

    let counts = match category_levels(column) {
        Some(levels) => levels
            .into_iter()
            .map(|level| (level.to_string(), observed.get(level).copied().unwrap_or(0)))
            .collect(),
        None => observed.into_iter().collect(),
    };

    Ok(CategoryCounts { column, counts })
}

/// Frequency table of quality scores.
pub fn quality_distribution(df: &DataFrame) -> Result<QualityDistribution> {
    let mut counts = BTreeMap::new();
    for score in quality_scores(df)? {
        *counts.entry(score).or_insert(0) += 1;
    }
    Ok(QualityDistribution { counts })
}

/// Everything the summary section reports
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
    pub categories: Vec<CategoryCounts>,
    pub quality: QualityDistribution,
}

impl TableSummary {
    pub fn column(&self, column: NumericColumn) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column == column)
    }

    pub fn categories_of(&self, column: CategoryColumn) -> Option<&CategoryCounts> {
        self.categories.iter().find(|c| c.column == column)
    }
}

/// Summarize the base columns, the log columns and every derived category.
pub fn summarize_table(df: &DataFrame) -> Result<TableSummary> {
    let mut numeric = NumericColumn::base_columns();
    numeric.push(NumericColumn::LogChlorides);
    numeric.push(NumericColumn::LogFreeSulfurDioxide);

    let columns = describe(df, &numeric)?;
    let categories = CategoryColumn::ALL
        .into_iter()
        .map(|c| category_counts(df, c))
        .collect::<Result<Vec<_>>>()?;

    Ok(TableSummary {
        rows: df.height(),
        columns,
        categories,
        quality: quality_distribution(df)?,
    })
}
