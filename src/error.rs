//! Error types for the winesight library.
//!
//! The variants follow how far a failure reaches: `Data` aborts the whole
//! run, `DegenerateInput` and `Configuration` only cost the report section
//! that raised them.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input file is missing, malformed, or does not match the wine schema.
    #[error("Data error: {0}")]
    Data(String),

    /// A column has zero variance, so correlation or fitting is undefined.
    #[error("Degenerate input: column '{column}' {reason}")]
    DegenerateInput { column: String, reason: String },

    /// Cross-validation or model settings incompatible with the data.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A derived column was requested before derivation ran.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// The chart backend failed to draw.
    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    pub fn degenerate(column: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::DegenerateInput {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// True for errors that only skip the current report section.
    pub fn is_section_local(&self) -> bool {
        matches!(
            self,
            AnalysisError::DegenerateInput { .. } | AnalysisError::Configuration(_)
        )
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
