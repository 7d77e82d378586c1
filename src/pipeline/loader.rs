//! Dataset loader for wine CSV and Parquet files
//!
//! Reads the file with polars, maps the header onto the canonical wine schema
//! and checks that the table is complete before anything downstream sees it.

use polars::prelude::*;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::schema::{Measure, ID_COLUMN, QUALITY_COLUMN};
use crate::error::{AnalysisError, Result};

/// Column count of a file carrying the row identifier
const COLUMNS_WITH_ID: usize = 13;

/// Column count of the raw layout without identifier
const COLUMNS_WITHOUT_ID: usize = 12;

/// Quality scores are averaged sensory ratings on a 0-10 scale
const QUALITY_RANGE: std::ops::RangeInclusive<i64> = 0..=10;

/// Load a dataset lazily from a file (CSV or Parquet based on extension)
pub fn load_dataset(path: &Path) -> Result<LazyFrame> {
    if !path.exists() {
        return Err(AnalysisError::Data(format!(
            "Input file not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_separator(detect_separator(path)?)
            .finish()
            .map_err(|e| {
                AnalysisError::Data(format!("Failed to load CSV file {}: {}", path.display(), e))
            })?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default()).map_err(|e| {
            AnalysisError::Data(format!(
                "Failed to load Parquet file {}: {}",
                path.display(),
                e
            ))
        })?,
        _ => {
            return Err(AnalysisError::Data(format!(
                "Unsupported file format: '{}'. Supported formats: csv, parquet",
                extension
            )))
        }
    };

    Ok(lf)
}

/// Load a wine table and conform it to the canonical schema.
///
/// The returned frame has `id` (Int64), the eleven measures (Float64) and
/// `quality` (Int64), in that order.
pub fn load_wine_table(path: &Path) -> Result<DataFrame> {
    let df = load_dataset(path)?
        .collect()
        .map_err(|e| AnalysisError::Data(format!("Failed to read {}: {}", path.display(), e)))?;

    conform_wine_table(df)
}

/// Map an already-collected frame onto the wine schema.
pub fn conform_wine_table(df: DataFrame) -> Result<DataFrame> {
    if df.height() == 0 {
        return Err(AnalysisError::Data("Input table has no rows".to_string()));
    }

    let columns = df.get_columns();
    let (id_column, feature_columns) = match columns.len() {
        COLUMNS_WITH_ID => (Some(&columns[0]), &columns[1..]),
        COLUMNS_WITHOUT_ID => (None, columns),
        n => {
            return Err(AnalysisError::Data(format!(
                "Expected {} columns (id, 11 measures, quality) or {} without id, found {}",
                COLUMNS_WITH_ID, COLUMNS_WITHOUT_ID, n
            )))
        }
    };

    let height = df.height();
    let id = match id_column {
        Some(col) => col.clone().with_name(ID_COLUMN.into()).cast(&DataType::Int64)?,
        None => Column::new(ID_COLUMN.into(), (1..=height as i64).collect::<Vec<i64>>()),
    };

    let mut measures: Vec<Option<Column>> = vec![None; Measure::ALL.len()];
    let mut quality: Option<Column> = None;

    for col in feature_columns {
        let normalized = normalize_header(col.name());
        if normalized == QUALITY_COLUMN {
            quality = Some(col.clone());
        } else if let Some(m) = Measure::from_column_name(&normalized) {
            let slot = &mut measures[m as usize];
            if slot.is_some() {
                return Err(AnalysisError::Data(format!(
                    "Column '{}' appears more than once",
                    m.column_name()
                )));
            }
            *slot = Some(col.clone());
        } else {
            return Err(AnalysisError::Data(format!(
                "Unexpected column '{}' in input",
                col.name()
            )));
        }
    }

    let mut out: Vec<Column> = Vec::with_capacity(COLUMNS_WITH_ID);
    check_complete(&id, ID_COLUMN)?;
    out.push(id);

    for (m, col) in Measure::ALL.into_iter().zip(measures) {
        let col = col.ok_or_else(|| {
            AnalysisError::Data(format!("Missing column '{}'", m.column_name()))
        })?;
        let float_col = col
            .with_name(m.column_name().into())
            .cast(&DataType::Float64)?;
        check_complete(&float_col, m.column_name())?;
        check_finite(&float_col, m.column_name())?;
        out.push(float_col);
    }

    let quality = quality
        .ok_or_else(|| AnalysisError::Data(format!("Missing column '{}'", QUALITY_COLUMN)))?
        .with_name(QUALITY_COLUMN.into());
    out.push(conform_quality(quality)?);

    Ok(DataFrame::new(out)?)
}

/// Row count, column count and estimated memory in MB
pub fn table_stats(df: &DataFrame) -> (usize, usize, f64) {
    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    (rows, cols, memory_mb)
}

/// Lowercase a header and collapse `.`, spaces and dashes to underscores.
///
/// R exports write `fixed.acidity`, the UCI files write `fixed acidity`.
pub fn normalize_header(name: &str) -> String {
    name.trim()
        .trim_matches('"')
        .to_lowercase()
        .chars()
        .map(|c| if c == '.' || c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Pick `;` for the UCI distribution files, `,` otherwise.
fn detect_separator(path: &Path) -> Result<u8> {
    let file = std::fs::File::open(path)?;
    let mut header = String::new();
    BufReader::new(file).read_line(&mut header)?;

    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    Ok(if semicolons > commas { b';' } else { b',' })
}

fn check_complete(col: &Column, name: &str) -> Result<()> {
    let nulls = col.null_count();
    if nulls > 0 {
        return Err(AnalysisError::Data(format!(
            "Column '{}' has {} missing or non-numeric value(s)",
            name, nulls
        )));
    }
    Ok(())
}

fn check_finite(col: &Column, name: &str) -> Result<()> {
    let ca = col.f64()?;
    if let Some((row, v)) = ca
        .iter()
        .enumerate()
        .find_map(|(row, v)| v.filter(|x| !x.is_finite()).map(|x| (row, x)))
    {
        return Err(AnalysisError::Data(format!(
            "Column '{}' has non-finite value {} at row {}",
            name, v, row
        )));
    }
    Ok(())
}

fn conform_quality(col: Column) -> Result<Column> {
    let float_col = col.cast(&DataType::Float64)?;
    check_complete(&float_col, QUALITY_COLUMN)?;

    for (row, v) in float_col.f64()?.iter().enumerate() {
        let v = v.unwrap_or(f64::NAN);
        if v.fract() != 0.0 || !QUALITY_RANGE.contains(&(v as i64)) {
            return Err(AnalysisError::Data(format!(
                "Quality must be an integer in 0-10, found {} at row {}",
                v, row
            )));
        }
    }

    Ok(float_col.cast(&DataType::Int64)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header_variants() {
        assert_eq!(normalize_header("fixed.acidity"), "fixed_acidity");
        assert_eq!(normalize_header("Free Sulfur Dioxide"), "free_sulfur_dioxide");
        assert_eq!(normalize_header("\"pH\""), "ph");
        assert_eq!(normalize_header("quality"), "quality");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("wine.xlsx");
        std::fs::write(&path, "x").unwrap();
        let Err(err) = load_dataset(&path) else { panic!("expected error") };
        assert!(matches!(err, AnalysisError::Data(msg) if msg.contains("Unsupported")));
    }
}
