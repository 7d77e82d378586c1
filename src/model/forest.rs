//! Random forest classifier built from CART trees
//!
//! Each tree is grown on a bootstrap sample, considering a random subset of
//! `mtry` features at every node, until nodes are pure or too small to split.
//! Split quality is the decrease in Gini impurity; the same decrease summed
//! per feature gives the forest's variable importance.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use super::derive_seed;
use crate::error::{AnalysisError, Result};

/// Nodes smaller than this are never split
const MIN_SPLIT_SAMPLES: usize = 2;

/// Values closer than this are treated as equal when searching splits
const VALUE_EPSILON: f64 = 1e-12;

/// Gini impurity of a class-count vector: 1 - sum(p_k^2)
fn gini_impurity(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let t = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / t;
            p * p
        })
        .sum::<f64>()
}

/// Most frequent class; ties go to the lowest class index.
fn majority(counts: &[usize]) -> usize {
    counts
        .iter()
        .enumerate()
        .fold((0, 0), |(best, best_n), (class, &n)| {
            if n > best_n {
                (class, n)
            } else {
                (best, best_n)
            }
        })
        .0
}

#[derive(Debug, Clone, Serialize)]
enum Node {
    Leaf {
        class: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Best split found at a node
struct Split {
    feature: usize,
    threshold: f64,
    /// Position in the sorted node indices where the right child starts
    at: usize,
    /// Weighted impurity decrease: n*G(parent) - n_l*G(left) - n_r*G(right)
    decrease: f64,
}

/// Search the best threshold on one feature.
///
/// `sorted` holds the node's sample indices ordered by the feature value.
fn best_split_on_feature(
    x: &[Vec<f64>],
    labels: &[usize],
    n_classes: usize,
    feature: usize,
    sorted: &[usize],
    parent_counts: &[usize],
) -> Option<Split> {
    let n = sorted.len();
    let parent = n as f64 * gini_impurity(parent_counts, n);

    let mut left = vec![0usize; n_classes];
    let mut right = parent_counts.to_vec();
    let mut best: Option<Split> = None;

    for i in 0..n - 1 {
        let label = labels[sorted[i]];
        left[label] += 1;
        right[label] -= 1;

        let here = x[sorted[i]][feature];
        let next = x[sorted[i + 1]][feature];
        if next - here < VALUE_EPSILON {
            continue;
        }

        let n_left = i + 1;
        let n_right = n - n_left;
        let children = n_left as f64 * gini_impurity(&left, n_left)
            + n_right as f64 * gini_impurity(&right, n_right);
        let decrease = parent - children;

        if decrease > best.as_ref().map(|b| b.decrease).unwrap_or(0.0) {
            best = Some(Split {
                feature,
                threshold: (here + next) / 2.0,
                at: n_left,
                decrease,
            });
        }
    }

    best
}

/// A single CART classification tree
#[derive(Debug, Clone, Serialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    /// Total Gini decrease per feature from this tree's splits
    pub importance: Vec<f64>,
}

impl DecisionTree {
    /// Grow a tree on `sample_idx` (may contain repeats, as in a bootstrap).
    pub fn grow(
        x: &[Vec<f64>],
        labels: &[usize],
        n_classes: usize,
        sample_idx: Vec<usize>,
        mtry: usize,
        rng: &mut StdRng,
    ) -> Self {
        let p = x.first().map(|r| r.len()).unwrap_or(0);
        let mut nodes: Vec<Node> = vec![Node::Leaf { class: 0 }];
        let mut importance = vec![0.0; p];
        // (node slot, samples reaching it)
        let mut pending: Vec<(usize, Vec<usize>)> = vec![(0, sample_idx)];

        while let Some((slot, idx)) = pending.pop() {
            let mut counts = vec![0usize; n_classes];
            for &i in &idx {
                counts[labels[i]] += 1;
            }
            let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;

            if pure || idx.len() < MIN_SPLIT_SAMPLES {
                nodes[slot] = Node::Leaf {
                    class: majority(&counts),
                };
                continue;
            }

            let candidates = sample(rng, p, mtry.min(p).max(1));
            let mut best: Option<(Split, Vec<usize>)> = None;
            for feature in candidates.iter() {
                let mut sorted = idx.clone();
                sorted.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));
                if let Some(split) =
                    best_split_on_feature(x, labels, n_classes, feature, &sorted, &counts)
                {
                    let better = best
                        .as_ref()
                        .map(|(b, _)| split.decrease > b.decrease)
                        .unwrap_or(true);
                    if better {
                        best = Some((split, sorted));
                    }
                }
            }

            match best {
                Some((split, sorted)) => {
                    importance[split.feature] += split.decrease;
                    let left_slot = nodes.len();
                    nodes.push(Node::Leaf { class: 0 });
                    let right_slot = nodes.len();
                    nodes.push(Node::Leaf { class: 0 });
                    nodes[slot] = Node::Split {
                        feature: split.feature,
                        threshold: split.threshold,
                        left: left_slot,
                        right: right_slot,
                    };
                    let right_idx = sorted[split.at..].to_vec();
                    let mut left_idx = sorted;
                    left_idx.truncate(split.at);
                    pending.push((right_slot, right_idx));
                    pending.push((left_slot, left_idx));
                }
                None => {
                    nodes[slot] = Node::Leaf {
                        class: majority(&counts),
                    };
                }
            }
        }

        Self { nodes, importance }
    }

    pub fn predict_row(&self, row: &[f64]) -> usize {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                Node::Leaf { class } => return *class,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Forest hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForestParams {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Features tried per split; `None` means floor(sqrt(p))
    pub mtry: Option<usize>,
    pub seed: u64,
}

/// Bootstrap-aggregated CART trees with majority voting
#[derive(Debug, Clone, Serialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    pub n_classes: usize,
    pub mtry: usize,
    /// Out-of-bag accuracy; `None` if no sample was ever out of bag
    pub oob_accuracy: Option<f64>,
}

impl RandomForest {
    /// Fit a forest on row-major features `x` and class indices `labels`.
    pub fn fit(x: &[Vec<f64>], labels: &[usize], params: ForestParams) -> Result<Self> {
        let n = x.len();
        if n == 0 || n != labels.len() {
            return Err(AnalysisError::Data(format!(
                "Forest needs matching non-empty features and labels ({} vs {})",
                n,
                labels.len()
            )));
        }
        if params.n_trees == 0 {
            return Err(AnalysisError::Configuration(
                "Random forest needs at least one tree".to_string(),
            ));
        }

        let p = x[0].len();
        if p == 0 {
            return Err(AnalysisError::Data("Forest needs at least one feature".to_string()));
        }
        let n_classes = labels.iter().max().map(|&m| m + 1).unwrap_or(1);
        let mtry = params
            .mtry
            .unwrap_or_else(|| (p as f64).sqrt().floor() as usize)
            .clamp(1, p.max(1));

        // Each tree owns its RNG stream so the result does not depend on scheduling
        let grown: Vec<(DecisionTree, Vec<bool>)> = (0..params.n_trees)
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(derive_seed(params.seed, t as u64));
                let mut in_bag = vec![false; n];
                let sample_idx: Vec<usize> = (0..n)
                    .map(|_| {
                        let i = rng.gen_range(0..n);
                        in_bag[i] = true;
                        i
                    })
                    .collect();
                let tree = DecisionTree::grow(x, labels, n_classes, sample_idx, mtry, &mut rng);
                (tree, in_bag)
            })
            .collect();

        let mut oob_votes = vec![vec![0usize; n_classes]; n];
        for (tree, in_bag) in &grown {
            for (i, row) in x.iter().enumerate() {
                if !in_bag[i] {
                    oob_votes[i][tree.predict_row(row)] += 1;
                }
            }
        }
        let (oob_seen, oob_correct) = oob_votes.iter().zip(labels).fold(
            (0usize, 0usize),
            |(seen, correct), (votes, &label)| {
                if votes.iter().all(|&v| v == 0) {
                    (seen, correct)
                } else {
                    (seen + 1, correct + usize::from(majority(votes) == label))
                }
            },
        );

        Ok(Self {
            trees: grown.into_iter().map(|(t, _)| t).collect(),
            n_classes,
            mtry,
            oob_accuracy: (oob_seen > 0).then(|| oob_correct as f64 / oob_seen as f64),
        })
    }

    pub fn predict_row(&self, row: &[f64]) -> usize {
        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            votes[tree.predict_row(row)] += 1;
        }
        majority(&votes)
    }

    pub fn predict(&self, rows: &[Vec<f64>]) -> Vec<usize> {
        rows.iter().map(|r| self.predict_row(r)).collect()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean decrease in Gini impurity per feature, averaged over trees
    pub fn raw_importance(&self) -> Vec<f64> {
        let p = self.trees.first().map(|t| t.importance.len()).unwrap_or(0);
        let mut total = vec![0.0; p];
        for tree in &self.trees {
            for (acc, v) in total.iter_mut().zip(&tree.importance) {
                *acc += v;
            }
        }
        let n = self.trees.len() as f64;
        total.into_iter().map(|v| v / n).collect()
    }
}
