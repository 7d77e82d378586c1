//! Ordinary least squares regression via the normal equations.

use faer::prelude::*;
use faer::{Mat, Side};
use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// Fitted linear model `y = intercept + X * coefficients`.
#[derive(Debug, Clone, Serialize)]
pub struct LinearModel {
    pub intercept: f64,
    /// Coefficients, one per feature column.
    pub coefficients: Vec<f64>,
    /// Standard errors of the coefficients (intercept excluded).
    pub std_errors: Vec<f64>,
    /// Residual standard error (sigma).
    pub sigma: f64,
    /// R-squared on the training data.
    pub r_squared: f64,
    /// Degrees of freedom (residual).
    pub df_residual: usize,
}

impl LinearModel {
    /// Fit OLS with an intercept to row-major `rows` and response `y`.
    pub fn fit(rows: &[Vec<f64>], y: &[f64]) -> Result<Self> {
        let n = rows.len();
        if n != y.len() {
            return Err(AnalysisError::Data(format!(
                "Design has {} rows but response has {}",
                n,
                y.len()
            )));
        }
        let p = rows.first().map(|r| r.len()).unwrap_or(0);
        let n_coef = p + 1;
        if n <= n_coef {
            return Err(AnalysisError::degenerate(
                "design matrix",
                format!("has {} rows for {} coefficients", n, n_coef),
            ));
        }

        let x = Mat::<f64>::from_fn(n, n_coef, |i, j| if j == 0 { 1.0 } else { rows[i][j - 1] });
        let y_mat = Mat::<f64>::from_fn(n, 1, |i, _| y[i]);

        let xtx = x.transpose() * &x;
        let xty = x.transpose() * &y_mat;

        let chol = xtx.cholesky(Side::Lower).map_err(|_| {
            AnalysisError::degenerate("design matrix", "is singular (collinear features)")
        })?;
        let beta = chol.solve(&xty);
        if (0..n_coef).any(|j| !beta[(j, 0)].is_finite()) {
            return Err(AnalysisError::degenerate(
                "design matrix",
                "produced non-finite coefficients",
            ));
        }
        let xtx_inv = chol.solve(&Mat::<f64>::identity(n_coef, n_coef));

        let fitted = &x * &beta;
        let y_mean = y.iter().sum::<f64>() / n as f64;
        let mut rss = 0.0;
        let mut tss = 0.0;
        for (i, &yi) in y.iter().enumerate() {
            let r = yi - fitted[(i, 0)];
            rss += r * r;
            tss += (yi - y_mean) * (yi - y_mean);
        }

        let df_residual = n - n_coef;
        let sigma2 = rss / df_residual as f64;
        let std_errors = (1..n_coef)
            .map(|j| (sigma2 * xtx_inv[(j, j)]).max(0.0).sqrt())
            .collect();

        Ok(Self {
            intercept: beta[(0, 0)],
            coefficients: (1..n_coef).map(|j| beta[(j, 0)]).collect(),
            std_errors,
            sigma: sigma2.sqrt(),
            r_squared: if tss > 0.0 { 1.0 - rss / tss } else { 0.0 },
            df_residual,
        })
    }

    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.intercept
            + row
                .iter()
                .zip(&self.coefficients)
                .map(|(x, b)| x * b)
                .sum::<f64>()
    }

    pub fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().map(|r| self.predict_row(r)).collect()
    }

    /// t statistics of the coefficients; `None` where the standard error is zero
    pub fn t_statistics(&self) -> Vec<Option<f64>> {
        self.coefficients
            .iter()
            .zip(&self.std_errors)
            .map(|(b, se)| if *se > 0.0 { Some(b / se) } else { None })
            .collect()
    }

    /// Raw importance per feature: |t|, or |coefficient| for an exact fit.
    pub fn raw_importance(&self) -> Vec<f64> {
        if self.sigma == 0.0 {
            return self.coefficients.iter().map(|b| b.abs()).collect();
        }
        self.t_statistics()
            .into_iter()
            .map(|t| t.map(f64::abs).unwrap_or(0.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_known_coefficients() {
        // y = 1 + 2a - 3b + small deterministic noise
        let rows: Vec<Vec<f64>> = (0..40)
            .map(|i| vec![i as f64 * 0.1, ((i * 7) % 11) as f64])
            .collect();
        let y: Vec<f64> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| 1.0 + 2.0 * r[0] - 3.0 * r[1] + if i % 2 == 0 { 0.01 } else { -0.01 })
            .collect();

        let model = LinearModel::fit(&rows, &y).unwrap();
        assert!((model.intercept - 1.0).abs() < 0.05);
        assert!((model.coefficients[0] - 2.0).abs() < 0.05);
        assert!((model.coefficients[1] + 3.0).abs() < 0.05);
        assert!(model.r_squared > 0.999);
        assert_eq!(model.df_residual, 37);

        let imp = model.raw_importance();
        assert!(imp[1] > imp[0], "b has the larger t statistic");
    }
}
