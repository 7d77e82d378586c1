//! Zero-mean, unit-variance feature scaling

use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// Per-feature centering and scaling learned from a training set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standardizer {
    pub means: Vec<f64>,
    /// Sample standard deviations (n - 1 denominator)
    pub std_devs: Vec<f64>,
}

impl Standardizer {
    /// Learn means and standard deviations from row-major `rows`.
    ///
    /// `names` labels the columns for the zero-variance error.
    pub fn fit(rows: &[Vec<f64>], names: &[&str]) -> Result<Self> {
        let n = rows.len();
        if n < 2 {
            return Err(AnalysisError::Data(format!(
                "Standardizing needs at least 2 rows, got {}",
                n
            )));
        }
        let p = rows[0].len();

        let mut means = vec![0.0; p];
        for row in rows {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= n as f64;
        }

        let mut std_devs = vec![0.0; p];
        for row in rows {
            for ((s, v), m) in std_devs.iter_mut().zip(row).zip(&means) {
                *s += (v - m) * (v - m);
            }
        }
        for (j, s) in std_devs.iter_mut().enumerate() {
            *s = (*s / (n - 1) as f64).sqrt();
            let constant = rows.iter().all(|r| r[j] == rows[0][j]);
            if constant || *s == 0.0 {
                let name = names.get(j).copied().unwrap_or("feature");
                return Err(AnalysisError::degenerate(
                    name,
                    "has zero variance and cannot be standardized",
                ));
            }
        }

        Ok(Self { means, std_devs })
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.std_devs))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| self.transform_row(r)).collect()
    }
}
