//! Seeded random-forest regressor.
//!
//! An ensemble of variance-reduction decision trees fit on bootstrap
//! samples. Every tree derives its RNG from `seed + tree index`, and
//! trees are fit in parallel with rayon — determinism does not depend on
//! thread scheduling. Prediction averages the per-tree outputs.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{NutriScanError, Result};
use crate::nutrition::attribute::NUM_ATTRS;

/// Maximum number of split thresholds evaluated per feature per node.
const MAX_SPLIT_CANDIDATES: usize = 16;

/// Minimum variance-reduction gain for a split to be worth taking.
const MIN_SPLIT_GAIN: f64 = 1e-12;

/// A regression tree over fixed-width feature rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<Box<TreeNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TreeNode {
    /// Feature index for the split (unused on leaves).
    feature: usize,
    /// Threshold value: rows with `feature <= threshold` go left.
    threshold: f64,
    /// Prediction value for leaf nodes.
    value: f64,
    left: Option<Box<TreeNode>>,
    right: Option<Box<TreeNode>>,
}

impl TreeNode {
    fn leaf(value: f64) -> Box<TreeNode> {
        Box::new(TreeNode {
            feature: 0,
            threshold: 0.0,
            value,
            left: None,
            right: None,
        })
    }

    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl DecisionTree {
    /// Fit a tree on the given sample indices, accumulating per-feature
    /// impurity-decrease into `importance`.
    fn fit(
        rows: &[[f64; NUM_ATTRS]],
        targets: &[f64],
        indices: &[usize],
        max_depth: usize,
        min_samples_split: usize,
        importance: &mut [f64; NUM_ATTRS],
    ) -> DecisionTree {
        let root = Self::build_node(
            rows,
            targets,
            indices,
            0,
            max_depth,
            min_samples_split,
            importance,
        );
        DecisionTree { root }
    }

    /// Predict the target value for one feature row.
    pub fn predict(&self, row: &[f64; NUM_ATTRS]) -> f64 {
        let mut node = match &self.root {
            Some(root) => root,
            None => return 0.0,
        };
        loop {
            if node.is_leaf() {
                return node.value;
            }
            let child = if row[node.feature] <= node.threshold {
                &node.left
            } else {
                &node.right
            };
            match child {
                Some(next) => node = next,
                None => return node.value,
            }
        }
    }

    fn build_node(
        rows: &[[f64; NUM_ATTRS]],
        targets: &[f64],
        indices: &[usize],
        depth: usize,
        max_depth: usize,
        min_samples_split: usize,
        importance: &mut [f64; NUM_ATTRS],
    ) -> Option<Box<TreeNode>> {
        if indices.is_empty() {
            return None;
        }

        let mean = indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64;
        if depth >= max_depth || indices.len() < min_samples_split {
            return Some(TreeNode::leaf(mean));
        }

        let parent_sse = sse(targets, indices);
        let split = Self::best_split(rows, targets, indices, parent_sse);
        let (feature, threshold, gain) = match split {
            Some(s) => s,
            None => return Some(TreeNode::leaf(mean)),
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| rows[i][feature] <= threshold);
        if left_idx.is_empty() || right_idx.is_empty() {
            return Some(TreeNode::leaf(mean));
        }

        importance[feature] += gain;

        let left = Self::build_node(
            rows,
            targets,
            &left_idx,
            depth + 1,
            max_depth,
            min_samples_split,
            importance,
        );
        let right = Self::build_node(
            rows,
            targets,
            &right_idx,
            depth + 1,
            max_depth,
            min_samples_split,
            importance,
        );

        Some(Box::new(TreeNode {
            feature,
            threshold,
            value: mean,
            left,
            right,
        }))
    }

    /// Find the (feature, threshold) pair with the highest variance
    /// reduction over candidate thresholds drawn from feature quantiles.
    fn best_split(
        rows: &[[f64; NUM_ATTRS]],
        targets: &[f64],
        indices: &[usize],
        parent_sse: f64,
    ) -> Option<(usize, f64, f64)> {
        let mut best: Option<(usize, f64, f64)> = None;

        for feature in 0..NUM_ATTRS {
            let mut values: Vec<f64> = indices.iter().map(|&i| rows[i][feature]).collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            values.dedup();
            if values.len() < 2 {
                continue;
            }

            let step = (values.len() - 1).div_ceil(MAX_SPLIT_CANDIDATES).max(1);
            for pair in values.windows(2).step_by(step) {
                let threshold = (pair[0] + pair[1]) / 2.0;

                let mut left_sum = 0.0;
                let mut left_sq = 0.0;
                let mut left_n = 0.0;
                let mut right_sum = 0.0;
                let mut right_sq = 0.0;
                let mut right_n = 0.0;
                for &i in indices {
                    let t = targets[i];
                    if rows[i][feature] <= threshold {
                        left_sum += t;
                        left_sq += t * t;
                        left_n += 1.0;
                    } else {
                        right_sum += t;
                        right_sq += t * t;
                        right_n += 1.0;
                    }
                }
                if left_n == 0.0 || right_n == 0.0 {
                    continue;
                }

                let child_sse = (left_sq - left_sum * left_sum / left_n)
                    + (right_sq - right_sum * right_sum / right_n);
                let gain = parent_sse - child_sse;
                if gain > MIN_SPLIT_GAIN
                    && best.is_none_or(|(_, _, best_gain)| gain > best_gain)
                {
                    best = Some((feature, threshold, gain));
                }
            }
        }

        best
    }
}

/// Sum of squared errors around the mean for the selected indices.
fn sse(targets: &[f64], indices: &[usize]) -> f64 {
    let n = indices.len() as f64;
    let sum: f64 = indices.iter().map(|&i| targets[i]).sum();
    let sq: f64 = indices.iter().map(|&i| targets[i] * targets[i]).sum();
    sq - sum * sum / n
}

/// A bagged ensemble of regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTree>,
}

impl RandomForestRegressor {
    /// Fit the forest on feature rows and targets.
    ///
    /// Returns the fitted forest and the normalized per-feature impurity
    /// importance. Each tree fits a bootstrap sample drawn from an RNG
    /// seeded with `seed + tree index`.
    pub fn fit(
        rows: &[[f64; NUM_ATTRS]],
        targets: &[f64],
        n_trees: usize,
        max_depth: usize,
        min_samples_split: usize,
        seed: u64,
    ) -> Result<(RandomForestRegressor, [f64; NUM_ATTRS])> {
        if rows.is_empty() || rows.len() != targets.len() {
            return Err(NutriScanError::invalid_argument(format!(
                "feature/target size mismatch: {} rows, {} targets",
                rows.len(),
                targets.len()
            )));
        }
        if n_trees == 0 {
            return Err(NutriScanError::invalid_argument(
                "forest must have at least one tree",
            ));
        }

        let n = rows.len();
        let fitted: Vec<(DecisionTree, [f64; NUM_ATTRS])> = (0..n_trees)
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(t as u64));
                let indices: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
                let mut importance = [0.0; NUM_ATTRS];
                let tree = DecisionTree::fit(
                    rows,
                    targets,
                    &indices,
                    max_depth,
                    min_samples_split,
                    &mut importance,
                );
                (tree, importance)
            })
            .collect();

        let mut trees = Vec::with_capacity(n_trees);
        let mut importance = [0.0; NUM_ATTRS];
        for (tree, tree_importance) in fitted {
            trees.push(tree);
            for (total, part) in importance.iter_mut().zip(tree_importance.iter()) {
                *total += part;
            }
        }
        let total: f64 = importance.iter().sum();
        if total > 0.0 {
            for value in &mut importance {
                *value /= total;
            }
        }

        Ok((RandomForestRegressor { trees }, importance))
    }

    /// Predict by averaging all tree outputs.
    pub fn predict(&self, row: &[f64; NUM_ATTRS]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|tree| tree.predict(row)).sum::<f64>() / self.trees.len() as f64
    }

    /// Number of trees in the ensemble.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(n: usize) -> (Vec<[f64; NUM_ATTRS]>, Vec<f64>) {
        // Target depends linearly on two features plus a step, so trees
        // have real structure to find.
        let mut rows = Vec::with_capacity(n);
        let mut targets = Vec::with_capacity(n);
        for i in 0..n {
            let mut row = [0.0; NUM_ATTRS];
            row[0] = (i % 17) as f64;
            row[1] = ((i * 7) % 23) as f64;
            row[2] = (i % 5) as f64;
            let target = 3.0 * row[0] - 2.0 * row[1] + if row[2] > 2.0 { 10.0 } else { 0.0 };
            rows.push(row);
            targets.push(target);
        }
        (rows, targets)
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let (rows, mut targets) = synthetic(20);
        targets.pop();
        assert!(RandomForestRegressor::fit(&rows, &targets, 5, 4, 2, 42).is_err());
        assert!(RandomForestRegressor::fit(&[], &[], 5, 4, 2, 42).is_err());
        let (rows, targets) = synthetic(20);
        assert!(RandomForestRegressor::fit(&rows, &targets, 0, 4, 2, 42).is_err());
    }

    #[test]
    fn test_forest_learns_structure() {
        let (rows, targets) = synthetic(300);
        let (forest, importance) =
            RandomForestRegressor::fit(&rows, &targets, 30, 10, 4, 42).unwrap();
        assert_eq!(forest.n_trees(), 30);

        // In-sample predictions should be close to the targets.
        let mse: f64 = rows
            .iter()
            .zip(targets.iter())
            .map(|(row, target)| (forest.predict(row) - target).powi(2))
            .sum::<f64>()
            / rows.len() as f64;
        assert!(mse < 25.0, "mse too high: {mse}");

        // Only the three informative features carry importance.
        let informative: f64 = importance[0] + importance[1] + importance[2];
        assert!(informative > 0.99, "importance {importance:?}");
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let (rows, targets) = synthetic(120);
        let (a, _) = RandomForestRegressor::fit(&rows, &targets, 10, 8, 4, 7).unwrap();
        let (b, _) = RandomForestRegressor::fit(&rows, &targets, 10, 8, 4, 7).unwrap();
        assert_eq!(a, b);
        let probe = rows[17];
        assert_eq!(a.predict(&probe).to_bits(), b.predict(&probe).to_bits());
    }

    #[test]
    fn test_constant_target_predicts_constant() {
        let rows = vec![[1.0; NUM_ATTRS]; 50];
        let targets = vec![42.0; 50];
        let (forest, importance) =
            RandomForestRegressor::fit(&rows, &targets, 5, 4, 2, 1).unwrap();
        assert!((forest.predict(&[1.0; NUM_ATTRS]) - 42.0).abs() < 1e-9);
        assert!(importance.iter().all(|v| *v == 0.0));
    }
}
