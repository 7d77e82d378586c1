//! Cross-validated model fitting against the quality score

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::folds::{kfold, stratified_kfold, Folds};
use super::forest::{ForestParams, RandomForest};
use super::importance::ImportanceRanking;
use super::linear::LinearModel;
use super::scale::Standardizer;
use super::{derive_seed, ModelConfig};
use crate::error::{AnalysisError, Result};
use crate::pipeline::{measure_matrix, quality_scores, Measure};

/// The eleven measures and the quality target, ready for fitting
#[derive(Debug, Clone)]
pub struct ModelData {
    /// Row-major feature matrix in `Measure::ALL` order
    pub x: Vec<Vec<f64>>,
    pub quality: Vec<i64>,
}

impl ModelData {
    pub fn from_table(df: &DataFrame) -> Result<Self> {
        Ok(Self {
            x: measure_matrix(df)?,
            quality: quality_scores(df)?,
        })
    }

    pub fn len(&self) -> usize {
        self.quality.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quality.is_empty()
    }

    /// Distinct quality scores (ascending) and each row's index into them
    pub fn class_labels(&self) -> (Vec<i64>, Vec<usize>) {
        let mut classes = self.quality.clone();
        classes.sort_unstable();
        classes.dedup();
        let labels = self
            .quality
            .iter()
            .map(|q| classes.binary_search(q).unwrap_or(0))
            .collect();
        (classes, labels)
    }

    fn rows(&self, idx: &[usize]) -> Vec<Vec<f64>> {
        idx.iter().map(|&i| self.x[i].clone()).collect()
    }
}

fn pick<T: Copy>(values: &[T], idx: &[usize]) -> Vec<T> {
    idx.iter().map(|&i| values[i]).collect()
}

fn mean_of(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn measure_names() -> Vec<&'static str> {
    Measure::ALL.iter().map(|m| m.column_name()).collect()
}

// ============================================================================
// Classification
// ============================================================================

/// Held-out performance of the classifier on one fold
#[derive(Debug, Clone, Serialize)]
pub struct ClassifierFold {
    pub fold: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub accuracy: f64,
    pub kappa: f64,
}

/// Cross-validated random forest results
#[derive(Debug, Clone, Serialize)]
pub struct ClassifierReport {
    pub folds: Vec<ClassifierFold>,
    pub mean_accuracy: f64,
    pub mean_kappa: f64,
    pub classes: Vec<i64>,
    pub n_trees: usize,
    pub mtry: usize,
    /// Out-of-bag accuracy of the final forest
    pub oob_accuracy: Option<f64>,
    pub importance: ImportanceRanking,
}

/// Cohen's kappa of predictions against truth over `n_classes` classes
pub fn cohens_kappa(truth: &[usize], predicted: &[usize], n_classes: usize) -> f64 {
    let n = truth.len();
    if n == 0 {
        return 0.0;
    }
    let mut actual = vec![0usize; n_classes];
    let mut guessed = vec![0usize; n_classes];
    let mut agree = 0usize;
    for (&t, &p) in truth.iter().zip(predicted) {
        actual[t] += 1;
        guessed[p] += 1;
        agree += usize::from(t == p);
    }
    let nf = n as f64;
    let observed = agree as f64 / nf;
    let expected: f64 = actual
        .iter()
        .zip(&guessed)
        .map(|(&a, &g)| (a as f64 / nf) * (g as f64 / nf))
        .sum();

    if (1.0 - expected).abs() < f64::EPSILON {
        0.0
    } else {
        (observed - expected) / (1.0 - expected)
    }
}

fn forest_params(config: &ModelConfig, stream: u64) -> ForestParams {
    ForestParams {
        n_trees: config.trees,
        mtry: config.mtry,
        seed: derive_seed(config.seed, stream),
    }
}

/// k-fold cross-validate a random forest with quality as a categorical target,
/// then fit the final forest on all rows for variable importance.
pub fn cross_validate_forest(data: &ModelData, config: &ModelConfig) -> Result<ClassifierReport> {
    let (classes, labels) = data.class_labels();
    if classes.len() < 2 {
        return Err(AnalysisError::degenerate(
            "quality",
            "has a single class; nothing to classify",
        ));
    }
    let folds: Folds = stratified_kfold(&labels, config.folds, config.seed)?;

    let fold_results: Vec<ClassifierFold> = (0..folds.len())
        .into_par_iter()
        .map(|f| -> Result<ClassifierFold> {
            let train = folds.training(f);
            let test = folds.testing(f);
            let forest = RandomForest::fit(
                &data.rows(&train),
                &pick(&labels, &train),
                forest_params(config, f as u64 + 1),
            )?;
            let truth = pick(&labels, test);
            let predicted = forest.predict(&data.rows(test));
            let correct = truth.iter().zip(&predicted).filter(|(a, b)| a == b).count();

            Ok(ClassifierFold {
                fold: f + 1,
                n_train: train.len(),
                n_test: test.len(),
                accuracy: correct as f64 / test.len() as f64,
                kappa: cohens_kappa(&truth, &predicted, classes.len()),
            })
        })
        .collect::<Result<_>>()?;

    let final_forest = RandomForest::fit(&data.x, &labels, forest_params(config, 0))?;
    let importance = ImportanceRanking::new(
        "random forest",
        &Measure::ALL,
        &final_forest.raw_importance(),
    );

    Ok(ClassifierReport {
        mean_accuracy: mean_of(fold_results.iter().map(|f| f.accuracy)),
        mean_kappa: mean_of(fold_results.iter().map(|f| f.kappa)),
        folds: fold_results,
        classes,
        n_trees: final_forest.n_trees(),
        mtry: final_forest.mtry,
        oob_accuracy: final_forest.oob_accuracy,
        importance,
    })
}

// ============================================================================
// Regression
// ============================================================================

/// Held-out performance of the regression on one fold
#[derive(Debug, Clone, Serialize)]
pub struct RegressionFold {
    pub fold: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub rmse: f64,
    /// Squared correlation of predictions and observations
    pub r_squared: Option<f64>,
    pub mae: f64,
}

/// Cross-validated linear regression results
#[derive(Debug, Clone, Serialize)]
pub struct RegressionReport {
    pub folds: Vec<RegressionFold>,
    pub mean_rmse: f64,
    pub mean_r_squared: Option<f64>,
    pub mean_mae: f64,
    /// Final-model coefficients on standardized features
    pub coefficients: Vec<(Measure, f64)>,
    pub intercept: f64,
    pub train_r_squared: f64,
    pub importance: ImportanceRanking,
}

/// Standardize on `train_rows`, fit OLS, and return the model with its scaler.
fn fit_standardized(train_rows: &[Vec<f64>], y: &[f64]) -> Result<(Standardizer, LinearModel)> {
    let scaler = Standardizer::fit(train_rows, &measure_names())?;
    let model = LinearModel::fit(&scaler.transform(train_rows), y)?;
    Ok((scaler, model))
}

/// k-fold cross-validate OLS on standardized features with quality as a
/// continuous target, then fit on all rows for variable importance.
pub fn cross_validate_linear(data: &ModelData, config: &ModelConfig) -> Result<RegressionReport> {
    let y: Vec<f64> = data.quality.iter().map(|&q| q as f64).collect();
    let folds = kfold(data.len(), config.folds, config.seed)?;

    let fold_results: Vec<RegressionFold> = (0..folds.len())
        .into_par_iter()
        .map(|f| -> Result<RegressionFold> {
            let train = folds.training(f);
            let test = folds.testing(f);
            let (scaler, model) = fit_standardized(&data.rows(&train), &pick(&y, &train))?;

            let predicted = model.predict(&scaler.transform(&data.rows(test)));
            let observed = pick(&y, test);
            let n = test.len() as f64;
            let sq: f64 = predicted
                .iter()
                .zip(&observed)
                .map(|(p, o)| (p - o) * (p - o))
                .sum();
            let abs: f64 = predicted.iter().zip(&observed).map(|(p, o)| (p - o).abs()).sum();

            Ok(RegressionFold {
                fold: f + 1,
                n_train: train.len(),
                n_test: test.len(),
                rmse: (sq / n).sqrt(),
                r_squared: crate::pipeline::pearson(&predicted, &observed).map(|r| r * r),
                mae: abs / n,
            })
        })
        .collect::<Result<_>>()?;

    let (_, final_model) = fit_standardized(&data.x, &y)?;
    let importance =
        ImportanceRanking::new("linear regression", &Measure::ALL, &final_model.raw_importance());

    let r2: Vec<f64> = fold_results.iter().filter_map(|f| f.r_squared).collect();

    Ok(RegressionReport {
        mean_rmse: mean_of(fold_results.iter().map(|f| f.rmse)),
        mean_r_squared: (!r2.is_empty()).then(|| mean_of(r2.into_iter())),
        mean_mae: mean_of(fold_results.iter().map(|f| f.mae)),
        folds: fold_results,
        coefficients: Measure::ALL
            .into_iter()
            .zip(final_model.coefficients.iter().copied())
            .collect(),
        intercept: final_model.intercept,
        train_r_squared: final_model.r_squared,
        importance,
    })
}
