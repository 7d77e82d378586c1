//! k-fold partitioning for cross-validation

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{AnalysisError, Result};

/// Disjoint held-out index sets, one per fold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folds {
    pub k: usize,
    pub held_out: Vec<Vec<usize>>,
    n: usize,
}

impl Folds {
    /// Training indices for fold `fold` (everything not held out), ascending
    pub fn training(&self, fold: usize) -> Vec<usize> {
        let mut in_fold = vec![false; self.n];
        for &i in &self.held_out[fold] {
            in_fold[i] = true;
        }
        (0..self.n).filter(|&i| !in_fold[i]).collect()
    }

    /// Held-out indices for fold `fold`, ascending
    pub fn testing(&self, fold: usize) -> &[usize] {
        &self.held_out[fold]
    }

    pub fn len(&self) -> usize {
        self.k
    }

    pub fn is_empty(&self) -> bool {
        self.k == 0
    }
}

fn check_k(n: usize, k: usize) -> Result<()> {
    if k < 2 {
        return Err(AnalysisError::Configuration(format!(
            "Cross-validation needs at least 2 folds, got {}",
            k
        )));
    }
    if n < k {
        return Err(AnalysisError::Configuration(format!(
            "Cannot form {} non-empty folds from {} rows",
            k, n
        )));
    }
    Ok(())
}

/// Shuffle `0..n` and deal it round-robin into `k` folds.
pub fn kfold(n: usize, k: usize, seed: u64) -> Result<Folds> {
    check_k(n, k)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut rng);

    let mut held_out = vec![Vec::with_capacity(n / k + 1); k];
    for (pos, idx) in order.into_iter().enumerate() {
        held_out[pos % k].push(idx);
    }
    for fold in &mut held_out {
        fold.sort_unstable();
    }

    Ok(Folds { k, held_out, n })
}

/// Class-stratified folds: every class is spread evenly across the `k` folds.
///
/// A class with fewer than `k` members cannot appear in every fold and is a
/// configuration error; the caller has to lower `k`.
pub fn stratified_kfold(labels: &[usize], k: usize, seed: u64) -> Result<Folds> {
    let n = labels.len();
    check_k(n, k)?;

    let n_classes = labels.iter().max().map(|&m| m + 1).unwrap_or(0);
    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (i, &label) in labels.iter().enumerate() {
        by_class[label].push(i);
    }

    if let Some((class, members)) = by_class
        .iter()
        .enumerate()
        .find(|(_, members)| !members.is_empty() && members.len() < k)
    {
        return Err(AnalysisError::Configuration(format!(
            "Class index {} has {} member(s), fewer than the {} folds requested",
            class,
            members.len(),
            k
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut held_out = vec![Vec::new(); k];
    // Continue dealing where the previous class stopped to balance fold sizes
    let mut next = 0usize;
    for members in by_class.iter_mut() {
        members.shuffle(&mut rng);
        for &idx in members.iter() {
            held_out[next % k].push(idx);
            next += 1;
        }
    }
    for fold in &mut held_out {
        fold.sort_unstable();
    }

    Ok(Folds { k, held_out, n })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kfold_partitions_all_rows() {
        let folds = kfold(10, 3, 7).unwrap();
        let mut all: Vec<usize> = folds.held_out.iter().flatten().copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
        assert!(folds.held_out.iter().all(|f| f.len() >= 3));
        assert_eq!(folds.training(0).len() + folds.testing(0).len(), 10);
    }

    #[test]
    fn test_kfold_rejects_bad_k() {
        assert!(matches!(kfold(10, 1, 0), Err(AnalysisError::Configuration(_))));
        assert!(matches!(kfold(2, 3, 0), Err(AnalysisError::Configuration(_))));
    }

    #[test]
    fn test_stratified_keeps_classes_in_every_fold() {
        let labels = vec![0, 0, 0, 1, 1, 1, 1, 1, 1, 2, 2, 2];
        let folds = stratified_kfold(&labels, 3, 11).unwrap();
        for fold in &folds.held_out {
            for class in 0..3 {
                assert!(fold.iter().any(|&i| labels[i] == class));
            }
        }
    }

    #[test]
    fn test_stratified_rejects_small_class() {
        let labels = vec![0, 0, 0, 0, 1, 1];
        let err = stratified_kfold(&labels, 3, 0).unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(msg) if msg.contains("2 member")));
    }

    #[test]
    fn test_same_seed_same_folds() {
        assert_eq!(kfold(50, 3, 42).unwrap(), kfold(50, 3, 42).unwrap());
    }
}
