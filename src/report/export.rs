//! JSON export of the report

use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use super::narrative::narrative;
use super::Report;
use crate::error::Result;

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the run (RFC 3339)
    pub timestamp: String,
    pub winesight_version: String,
    pub input_file: String,
    pub rows: usize,
    /// Names of the charts written next to the export
    pub charts: Vec<String>,
}

/// Complete export: metadata, every section and the generated discussion
#[derive(Serialize)]
pub struct ReportExport<'a> {
    pub metadata: ReportMetadata,
    #[serde(flatten)]
    pub report: &'a Report,
    pub narrative: Vec<String>,
}

impl<'a> ReportExport<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                winesight_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: report.config.input.display().to_string(),
                rows: report.summary.rows,
                charts: report.charts.iter().map(|c| format!("{}.svg", c.name)).collect(),
            },
            report,
            narrative: narrative(report),
        }
    }
}

/// Write the report as pretty-printed JSON to `output_path`.
pub fn export_report(report: &Report, output_path: &Path) -> Result<()> {
    let export = ReportExport::new(report);
    let json = serde_json::to_string_pretty(&export)?;
    std::fs::write(output_path, json)?;
    Ok(())
}
