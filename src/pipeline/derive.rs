//! Derived features: fixed-threshold categories and log columns
//!
//! Each derivation is a pure function from the current table to one new
//! column. `derive_features` applies them in order and returns a new frame;
//! the input frame is never touched.
//!
//! Bins are half-open `[lo, hi)`: a value sitting exactly on a cut point
//! belongs to the higher bin, so 4.0 g/dm³ of sugar is medium-dry.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::schema::{numeric_values, CategoryColumn, Measure, NumericColumn};
use crate::error::{AnalysisError, Result};

/// Residual sugar cut points (g/dm³) between dry, medium-dry, medium and sweet
pub const SWEETNESS_CUTS: [f64; 3] = [4.0, 12.0, 45.0];

/// Alcohol cut points (% vol) between the four alcohol categories
pub const ALCOHOL_CUTS: [f64; 3] = [12.5, 13.5, 14.5];

/// Quality cut points between poor, average and good
pub const QUALITY_CUTS: [f64; 2] = [5.5, 7.5];

/// Lower edge of the first density bucket (g/cm³)
pub const DENSITY_BUCKET_ORIGIN: f64 = 0.985;

/// Width of each density bucket (g/cm³)
pub const DENSITY_BUCKET_WIDTH: f64 = 0.005;

/// Index of the `[lo, hi)` bin a value falls into.
fn bin_index(value: f64, cuts: &[f64]) -> usize {
    cuts.iter().take_while(|&&cut| value >= cut).count()
}

fn finite(value: f64, column: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::Data(format!(
            "Cannot derive category from non-finite {} value {}",
            column, value
        )))
    }
}

/// Sweetness of a wine by residual sugar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sweetness {
    Dry,
    MediumDry,
    Medium,
    Sweet,
}

impl Sweetness {
    pub const LEVELS: [Sweetness; 4] = [
        Sweetness::Dry,
        Sweetness::MediumDry,
        Sweetness::Medium,
        Sweetness::Sweet,
    ];

    pub fn from_residual_sugar(sugar: f64) -> Result<Self> {
        let sugar = finite(sugar, Measure::ResidualSugar.column_name())?;
        Ok(Self::LEVELS[bin_index(sugar, &SWEETNESS_CUTS)])
    }

    pub fn label(self) -> &'static str {
        match self {
            Sweetness::Dry => "dry",
            Sweetness::MediumDry => "medium-dry",
            Sweetness::Medium => "medium",
            Sweetness::Sweet => "sweet",
        }
    }
}

/// Ordered alcohol category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlcoholCategory {
    VeryLow,
    ModeratelyLow,
    High,
    VeryHigh,
}

impl AlcoholCategory {
    pub const LEVELS: [AlcoholCategory; 4] = [
        AlcoholCategory::VeryLow,
        AlcoholCategory::ModeratelyLow,
        AlcoholCategory::High,
        AlcoholCategory::VeryHigh,
    ];

    pub fn from_alcohol(alcohol: f64) -> Result<Self> {
        let alcohol = finite(alcohol, Measure::Alcohol.column_name())?;
        Ok(Self::LEVELS[bin_index(alcohol, &ALCOHOL_CUTS)])
    }

    pub fn label(self) -> &'static str {
        match self {
            AlcoholCategory::VeryLow => "very-low",
            AlcoholCategory::ModeratelyLow => "moderately-low",
            AlcoholCategory::High => "high",
            AlcoholCategory::VeryHigh => "very-high",
        }
    }
}

/// Coarse quality grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityCategory {
    Poor,
    Average,
    Good,
}

impl QualityCategory {
    pub const LEVELS: [QualityCategory; 3] = [
        QualityCategory::Poor,
        QualityCategory::Average,
        QualityCategory::Good,
    ];

    pub fn from_quality(quality: f64) -> Result<Self> {
        let quality = finite(quality, NumericColumn::Quality.column_name())?;
        Ok(Self::LEVELS[bin_index(quality, &QUALITY_CUTS)])
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityCategory::Poor => "poor",
            QualityCategory::Average => "average",
            QualityCategory::Good => "good",
        }
    }
}

/// Fixed-width density bucket label, e.g. `[0.990, 0.995)`.
pub fn density_bucket(density: f64) -> Result<String> {
    let density = finite(density, Measure::Density.column_name())?;
    // Nudge up so a value on an edge is not floored into the bucket below
    let index = ((density - DENSITY_BUCKET_ORIGIN) / DENSITY_BUCKET_WIDTH + 1e-9).floor();
    let lo = DENSITY_BUCKET_ORIGIN + index * DENSITY_BUCKET_WIDTH;
    Ok(format!("[{:.3}, {:.3})", lo, lo + DENSITY_BUCKET_WIDTH))
}

/// How the `log_*` columns are computed.
///
/// The analysis this report reproduces assigned the raw values to its log
/// columns; `Identity` keeps that behaviour so its correlation figures can be
/// compared, `Natural` applies `ln`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTransform {
    #[default]
    Identity,
    Natural,
}

impl LogTransform {
    pub fn apply(self, value: f64, column: &str) -> Result<f64> {
        match self {
            LogTransform::Identity => Ok(value),
            LogTransform::Natural if value > 0.0 => Ok(value.ln()),
            LogTransform::Natural => Err(AnalysisError::Data(format!(
                "Cannot take log of non-positive {} value {}",
                column, value
            ))),
        }
    }
}

impl std::fmt::Display for LogTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogTransform::Identity => write!(f, "identity"),
            LogTransform::Natural => write!(f, "natural"),
        }
    }
}

impl std::str::FromStr for LogTransform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "identity" | "none" => Ok(LogTransform::Identity),
            "natural" | "ln" => Ok(LogTransform::Natural),
            _ => Err(format!(
                "Unknown log mode: '{}'. Use 'identity' or 'natural'.",
                s
            )),
        }
    }
}

/// One derived column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    Sweetness,
    AlcoholCategory,
    QualityCategory,
    DensityBucket,
    LogChlorides(LogTransform),
    LogFreeSulfurDioxide(LogTransform),
}

impl Derivation {
    /// Name of the column this derivation produces.
    pub fn column_name(self) -> &'static str {
        match self {
            Derivation::Sweetness => CategoryColumn::Sweetness.column_name(),
            Derivation::AlcoholCategory => CategoryColumn::AlcoholCategory.column_name(),
            Derivation::QualityCategory => CategoryColumn::QualityCategory.column_name(),
            Derivation::DensityBucket => CategoryColumn::DensityBucket.column_name(),
            Derivation::LogChlorides(_) => NumericColumn::LogChlorides.column_name(),
            Derivation::LogFreeSulfurDioxide(_) => NumericColumn::LogFreeSulfurDioxide.column_name(),
        }
    }

    /// Compute the column from the base measures of `df`.
    pub fn compute(self, df: &DataFrame) -> Result<Column> {
        let name = self.column_name();
        let column = match self {
            Derivation::Sweetness => {
                let labels = map_labels(df, Measure::ResidualSugar, |v| {
                    Sweetness::from_residual_sugar(v).map(|s| s.label().to_string())
                })?;
                Column::new(name.into(), labels)
            }
            Derivation::AlcoholCategory => {
                let labels = map_labels(df, Measure::Alcohol, |v| {
                    AlcoholCategory::from_alcohol(v).map(|a| a.label().to_string())
                })?;
                Column::new(name.into(), labels)
            }
            Derivation::QualityCategory => {
                let labels = numeric_values(df, NumericColumn::Quality)?
                    .into_iter()
                    .map(|v| QualityCategory::from_quality(v).map(|q| q.label().to_string()))
                    .collect::<Result<Vec<String>>>()?;
                Column::new(name.into(), labels)
            }
            Derivation::DensityBucket => {
                let labels = map_labels(df, Measure::Density, density_bucket)?;
                Column::new(name.into(), labels)
            }
            Derivation::LogChlorides(mode) => {
                Column::new(name.into(), map_log(df, Measure::Chlorides, mode)?)
            }
            Derivation::LogFreeSulfurDioxide(mode) => {
                Column::new(name.into(), map_log(df, Measure::FreeSulfurDioxide, mode)?)
            }
        };
        Ok(column)
    }
}

fn map_labels<F>(df: &DataFrame, measure: Measure, f: F) -> Result<Vec<String>>
where
    F: Fn(f64) -> Result<String>,
{
    numeric_values(df, measure.into())?.into_iter().map(f).collect()
}

fn map_log(df: &DataFrame, measure: Measure, mode: LogTransform) -> Result<Vec<f64>> {
    numeric_values(df, measure.into())?
        .into_iter()
        .map(|v| mode.apply(v, measure.column_name()))
        .collect()
}

/// The fixed derivation order of the report.
pub fn standard_derivations(log_mode: LogTransform) -> Vec<Derivation> {
    vec![
        Derivation::Sweetness,
        Derivation::AlcoholCategory,
        Derivation::QualityCategory,
        Derivation::DensityBucket,
        Derivation::LogChlorides(log_mode),
        Derivation::LogFreeSulfurDioxide(log_mode),
    ]
}

/// Apply `derivations` in order and return the augmented table.
///
/// A column that already exists under a derivation's name is replaced, so
/// deriving twice yields the same table as deriving once.
pub fn apply_derivations(df: &DataFrame, derivations: &[Derivation]) -> Result<DataFrame> {
    let mut out = df.clone();
    for derivation in derivations {
        let column = derivation.compute(&out)?;
        out.with_column(column)?;
    }
    Ok(out)
}

/// Derive all six report columns.
pub fn derive_features(df: &DataFrame, log_mode: LogTransform) -> Result<DataFrame> {
    apply_derivations(df, &standard_derivations(log_mode))
}
