//! Model module - cross-validated quality models and variable importance

pub mod cv;
pub mod folds;
pub mod forest;
pub mod importance;
pub mod linear;
pub mod scale;

pub use cv::*;
pub use folds::{kfold, stratified_kfold, Folds};
pub use forest::{DecisionTree, ForestParams, RandomForest};
pub use importance::*;
pub use linear::LinearModel;
pub use scale::Standardizer;

use serde::Serialize;

/// Default number of cross-validation folds
pub const DEFAULT_FOLDS: usize = 3;

/// Default random forest ensemble size
pub const DEFAULT_TREES: usize = 100;

/// Default seed for fold assignment and bootstrap sampling
pub const DEFAULT_SEED: u64 = 42;

/// Settings shared by both models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelConfig {
    pub folds: usize,
    pub trees: usize,
    /// Features tried per split; `None` means floor(sqrt(p))
    pub mtry: Option<usize>,
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            folds: DEFAULT_FOLDS,
            trees: DEFAULT_TREES,
            mtry: None,
            seed: DEFAULT_SEED,
        }
    }
}

/// Independent seed for stream `stream` under `seed` (splitmix64 finalizer).
pub fn derive_seed(seed: u64, stream: u64) -> u64 {
    let mut z = seed
        .wrapping_add(stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
