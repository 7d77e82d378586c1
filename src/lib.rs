//! Winesight: Wine Quality Analysis Library
//!
//! Loads a wine physicochemical table, derives categorical and log features,
//! summarizes and correlates the measures, fits cross-validated quality
//! models and renders the results as an HTML report with SVG charts.

pub mod charts;
pub mod cli;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use error::{AnalysisError, Result};
