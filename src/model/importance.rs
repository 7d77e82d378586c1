//! Variable importance scaled to a common 0-100 range

use serde::Serialize;

use crate::pipeline::Measure;

/// Importance of one feature in one model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub measure: Measure,
    /// Model-specific score (Gini decrease, |t|)
    pub raw: f64,
    /// Min-max scaled score in [0, 100]
    pub score: f64,
}

/// Features of one model, most important first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportanceRanking {
    pub model: String,
    pub entries: Vec<FeatureImportance>,
}

impl ImportanceRanking {
    /// Rank `raw` scores (aligned with `features`) for the named model.
    pub fn new(model: impl Into<String>, features: &[Measure], raw: &[f64]) -> Self {
        let scaled = scale_to_100(raw);
        let mut entries: Vec<FeatureImportance> = features
            .iter()
            .zip(raw.iter().zip(scaled))
            .map(|(&measure, (&raw, score))| FeatureImportance {
                measure,
                raw,
                score,
            })
            .collect();

        // Stable sort keeps table order among equal scores
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));

        Self {
            model: model.into(),
            entries,
        }
    }

    pub fn top(&self) -> Option<Measure> {
        self.entries.first().map(|e| e.measure)
    }

    pub fn score_of(&self, measure: Measure) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.measure == measure)
            .map(|e| e.score)
    }

    /// 1-based rank of a feature
    pub fn rank_of(&self, measure: Measure) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.measure == measure)
            .map(|p| p + 1)
    }
}

/// Min-max scale to [0, 100]. Equal scores all map to 100 (0 if all are zero).
pub fn scale_to_100(raw: &[f64]) -> Vec<f64> {
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    raw.iter()
        .map(|&v| {
            if range > 0.0 {
                (v - min) / range * 100.0
            } else if max > 0.0 {
                100.0
            } else {
                0.0
            }
        })
        .collect()
}
