//! Random Forest Regressor
//!
//! Variance-reduction regression trees over bootstrap samples, averaged at
//! predict time. Deterministic for a fixed seed. The fitted forest persists
//! as an explicit JSON artifact loadable without the training code path.

use crate::regressor::Regressor;
use crate::ModelError;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Forest hyperparameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum tree depth; `None` grows until leaves are pure or too small
    pub max_depth: Option<usize>,
    /// Minimum samples required on each side of a split
    pub min_samples_leaf: usize,
    /// Minimum samples required to consider splitting a node
    pub min_samples_split: usize,
    /// Features considered per split; `None` uses all columns
    pub max_features: Option<usize>,
    /// RNG seed for bootstrap and feature sampling
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_leaf: 1,
            min_samples_split: 2,
            max_features: None,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    fn fit(
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: Vec<usize>,
        config: &ForestConfig,
        rng: &mut StdRng,
    ) -> Self {
        let mut nodes = Vec::new();
        grow(x, y, indices, 0, config, rng, &mut nodes);
        Self { nodes }
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Grow a subtree over `indices`, append its nodes, and return the root index.
fn grow(
    x: &Array2<f64>,
    y: &Array1<f64>,
    mut indices: Vec<usize>,
    depth: usize,
    config: &ForestConfig,
    rng: &mut StdRng,
    nodes: &mut Vec<Node>,
) -> usize {
    let n = indices.len();
    let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / n as f64;

    let depth_limited = config.max_depth.is_some_and(|d| depth >= d);
    if n < config.min_samples_split || n < 2 * config.min_samples_leaf || depth_limited {
        nodes.push(Node::Leaf { value: mean });
        return nodes.len() - 1;
    }

    let Some((feature, threshold)) = best_split(x, y, &indices, config, rng) else {
        nodes.push(Node::Leaf { value: mean });
        return nodes.len() - 1;
    };

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
        indices.drain(..).partition(|&i| x[[i, feature]] <= threshold);

    let left = grow(x, y, left_idx, depth + 1, config, rng, nodes);
    let right = grow(x, y, right_idx, depth + 1, config, rng, nodes);
    nodes.push(Node::Split {
        feature,
        threshold,
        left,
        right,
    });
    nodes.len() - 1
}

/// Pick the (feature, threshold) pair minimizing the summed squared error of
/// the two children, over a sampled feature subset. Returns `None` when no
/// split separates the samples while respecting `min_samples_leaf`.
fn best_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    indices: &[usize],
    config: &ForestConfig,
    rng: &mut StdRng,
) -> Option<(usize, f64)> {
    let n_features = x.ncols();
    let k = config.max_features.unwrap_or(n_features).clamp(1, n_features);
    let candidates: Vec<usize> = rand::seq::index::sample(rng, n_features, k).into_vec();

    let n = indices.len();
    let mut best: Option<(usize, f64, f64)> = None; // (feature, threshold, score)
    let mut sorted = indices.to_vec();

    for &feature in &candidates {
        sorted.sort_by(|&a, &b| {
            x[[a, feature]]
                .partial_cmp(&x[[b, feature]])
                .unwrap_or(Ordering::Equal)
        });

        // Prefix sums of y and y^2 along the sorted order.
        let mut sum_left = 0.0;
        let mut sumsq_left = 0.0;
        let total_sum: f64 = sorted.iter().map(|&i| y[i]).sum();
        let total_sumsq: f64 = sorted.iter().map(|&i| y[i] * y[i]).sum();

        for split in 1..n {
            let prev = sorted[split - 1];
            sum_left += y[prev];
            sumsq_left += y[prev] * y[prev];

            let left_n = split;
            let right_n = n - split;
            if left_n < config.min_samples_leaf || right_n < config.min_samples_leaf {
                continue;
            }

            let left_val = x[[prev, feature]];
            let right_val = x[[sorted[split], feature]];
            if left_val == right_val {
                continue;
            }

            let sum_right = total_sum - sum_left;
            let sumsq_right = total_sumsq - sumsq_left;
            let sse_left = sumsq_left - sum_left * sum_left / left_n as f64;
            let sse_right = sumsq_right - sum_right * sum_right / right_n as f64;
            let score = sse_left + sse_right;

            if best.map_or(true, |(_, _, s)| score < s) {
                best = Some((feature, (left_val + right_val) / 2.0, score));
            }
        }
    }

    best.map(|(feature, threshold, _)| (feature, threshold))
}

/// Ensemble of regression trees over bootstrap samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    config: ForestConfig,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForestRegressor {
    /// Create an unfitted forest
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    /// Whether fit has completed (or an artifact was loaded)
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Hyperparameters this forest was configured with
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Persist the fitted forest as a JSON artifact
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        if !self.is_fitted() {
            return Err(ModelError::NotFitted);
        }
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        info!("Saved model artifact to {}", path.display());
        Ok(())
    }

    /// Load a fitted forest from a JSON artifact
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = fs::read_to_string(path)?;
        let forest: Self = serde_json::from_str(&json)?;
        if !forest.is_fitted() {
            return Err(ModelError::NotFitted);
        }
        info!(
            "Loaded model artifact from {} ({} trees, {} features)",
            path.display(),
            forest.trees.len(),
            forest.n_features
        );
        Ok(forest)
    }
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        let n = x.nrows();
        if n == 0 {
            return Err(ModelError::InvalidTrainingSet("no rows".to_string()));
        }
        if n != y.len() {
            return Err(ModelError::InvalidTrainingSet(format!(
                "{} feature rows but {} targets",
                n,
                y.len()
            )));
        }

        info!(
            "Fitting random forest: {} trees over {} rows x {} features",
            self.config.n_estimators,
            n,
            x.ncols()
        );

        let mut trees = Vec::with_capacity(self.config.n_estimators);
        for t in 0..self.config.n_estimators {
            let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(t as u64));
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            trees.push(RegressionTree::fit(x, y, sample, &self.config, &mut rng));
            debug!("Fitted tree {}/{}", t + 1, self.config.n_estimators);
        }

        self.trees = trees;
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        if !self.is_fitted() {
            return Err(ModelError::NotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }

        let predictions = x
            .rows()
            .into_iter()
            .map(|row| {
                let row = row.to_vec();
                let sum: f64 = self.trees.iter().map(|t| t.predict_row(&row)).sum();
                sum / self.trees.len() as f64
            })
            .collect();
        Ok(Array1::from_vec(predictions))
    }
}
