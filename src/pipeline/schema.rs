//! Typed column catalogue for the wine table
//!
//! Every column the report touches is an enum variant. Callers never spell
//! a column name; they pick a variant and the name comes from here.

use polars::prelude::*;
use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// Name of the sequential identifier column
pub const ID_COLUMN: &str = "id";

/// Name of the quality score column
pub const QUALITY_COLUMN: &str = "quality";

/// The eleven physicochemical measurements of a wine sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Measure {
    FixedAcidity,
    VolatileAcidity,
    CitricAcid,
    ResidualSugar,
    Chlorides,
    FreeSulfurDioxide,
    TotalSulfurDioxide,
    Density,
    Ph,
    Sulphates,
    Alcohol,
}

impl Measure {
    /// All measures in file order.
    pub const ALL: [Measure; 11] = [
        Measure::FixedAcidity,
        Measure::VolatileAcidity,
        Measure::CitricAcid,
        Measure::ResidualSugar,
        Measure::Chlorides,
        Measure::FreeSulfurDioxide,
        Measure::TotalSulfurDioxide,
        Measure::Density,
        Measure::Ph,
        Measure::Sulphates,
        Measure::Alcohol,
    ];

    /// Canonical column name in the loaded table.
    pub fn column_name(self) -> &'static str {
        match self {
            Measure::FixedAcidity => "fixed_acidity",
            Measure::VolatileAcidity => "volatile_acidity",
            Measure::CitricAcid => "citric_acid",
            Measure::ResidualSugar => "residual_sugar",
            Measure::Chlorides => "chlorides",
            Measure::FreeSulfurDioxide => "free_sulfur_dioxide",
            Measure::TotalSulfurDioxide => "total_sulfur_dioxide",
            Measure::Density => "density",
            Measure::Ph => "ph",
            Measure::Sulphates => "sulphates",
            Measure::Alcohol => "alcohol",
        }
    }

    /// Human readable label used on chart axes and in tables.
    pub fn label(self) -> &'static str {
        match self {
            Measure::FixedAcidity => "Fixed acidity (g/dm³)",
            Measure::VolatileAcidity => "Volatile acidity (g/dm³)",
            Measure::CitricAcid => "Citric acid (g/dm³)",
            Measure::ResidualSugar => "Residual sugar (g/dm³)",
            Measure::Chlorides => "Chlorides (g/dm³)",
            Measure::FreeSulfurDioxide => "Free SO₂ (mg/dm³)",
            Measure::TotalSulfurDioxide => "Total SO₂ (mg/dm³)",
            Measure::Density => "Density (g/cm³)",
            Measure::Ph => "pH",
            Measure::Sulphates => "Sulphates (g/dm³)",
            Measure::Alcohol => "Alcohol (% vol)",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Measure> {
        Measure::ALL.into_iter().find(|m| m.column_name() == name)
    }
}

impl std::fmt::Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// Any numeric column: a base measure, the quality score, or a derived log column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NumericColumn {
    Measure(Measure),
    Quality,
    LogChlorides,
    LogFreeSulfurDioxide,
}

impl NumericColumn {
    /// Base measures followed by quality, the layout models and summaries use.
    pub fn base_columns() -> Vec<NumericColumn> {
        Measure::ALL
            .into_iter()
            .map(NumericColumn::Measure)
            .chain(std::iter::once(NumericColumn::Quality))
            .collect()
    }

    pub fn column_name(self) -> &'static str {
        match self {
            NumericColumn::Measure(m) => m.column_name(),
            NumericColumn::Quality => QUALITY_COLUMN,
            NumericColumn::LogChlorides => "log_chlorides",
            NumericColumn::LogFreeSulfurDioxide => "log_free_sulfur_dioxide",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NumericColumn::Measure(m) => m.label(),
            NumericColumn::Quality => "Quality score",
            NumericColumn::LogChlorides => "log(chlorides)",
            NumericColumn::LogFreeSulfurDioxide => "log(free SO₂)",
        }
    }
}

impl From<Measure> for NumericColumn {
    fn from(m: Measure) -> Self {
        NumericColumn::Measure(m)
    }
}

/// Categorical columns appended by the feature deriver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CategoryColumn {
    Sweetness,
    AlcoholCategory,
    QualityCategory,
    DensityBucket,
}

impl CategoryColumn {
    pub const ALL: [CategoryColumn; 4] = [
        CategoryColumn::Sweetness,
        CategoryColumn::AlcoholCategory,
        CategoryColumn::QualityCategory,
        CategoryColumn::DensityBucket,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            CategoryColumn::Sweetness => "sweetness",
            CategoryColumn::AlcoholCategory => "alcohol_category",
            CategoryColumn::QualityCategory => "quality_category",
            CategoryColumn::DensityBucket => "density_bucket",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryColumn::Sweetness => "Sweetness",
            CategoryColumn::AlcoholCategory => "Alcohol category",
            CategoryColumn::QualityCategory => "Quality category",
            CategoryColumn::DensityBucket => "Density bucket",
        }
    }
}

/// Read a numeric column as `f64` values.
///
/// Nulls are rejected: the loader guarantees a complete table, so a null here
/// means the table did not come from the loader.
pub fn numeric_values(df: &DataFrame, column: NumericColumn) -> Result<Vec<f64>> {
    let name = column.column_name();
    let col = df
        .column(name)
        .map_err(|_| AnalysisError::ColumnNotFound(name.to_string()))?;
    let float_col = col.cast(&DataType::Float64)?;
    let ca = float_col.f64()?;

    ca.iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| {
                AnalysisError::Data(format!("Column '{}' has a missing value at row {}", name, row))
            })
        })
        .collect()
}

/// Read a categorical column as owned labels.
pub fn category_labels(df: &DataFrame, column: CategoryColumn) -> Result<Vec<String>> {
    let name = column.column_name();
    let col = df
        .column(name)
        .map_err(|_| AnalysisError::ColumnNotFound(name.to_string()))?;
    let ca = col.str()?;

    ca.iter()
        .enumerate()
        .map(|(row, v)| {
            v.map(|s| s.to_string()).ok_or_else(|| {
                AnalysisError::Data(format!("Column '{}' has a missing label at row {}", name, row))
            })
        })
        .collect()
}

/// Quality scores as integers.
pub fn quality_scores(df: &DataFrame) -> Result<Vec<i64>> {
    let col = df
        .column(QUALITY_COLUMN)
        .map_err(|_| AnalysisError::ColumnNotFound(QUALITY_COLUMN.to_string()))?;
    let int_col = col.cast(&DataType::Int64)?;
    let ca = int_col.i64()?;

    ca.iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| {
                AnalysisError::Data(format!("Quality is missing at row {}", row))
            })
        })
        .collect()
}

/// Feature matrix (row-major) of the eleven base measures.
pub fn measure_matrix(df: &DataFrame) -> Result<Vec<Vec<f64>>> {
    let columns: Vec<Vec<f64>> = Measure::ALL
        .into_iter()
        .map(|m| numeric_values(df, m.into()))
        .collect::<Result<_>>()?;

    let rows = df.height();
    Ok((0..rows)
        .map(|r| columns.iter().map(|c| c[r]).collect())
        .collect())
}
