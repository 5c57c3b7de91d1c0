// src/models/classifier.rs
use anyhow::{bail, Result};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

const LEAF: i64 = -1;

/// One regression tree in the array layout scikit-learn exposes as `tree_`.
/// Node `i` is a leaf when `children_left[i] == -1`; otherwise samples with
/// `x[feature[i]] <= threshold[i]` go left.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegressionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl RegressionTree {
    fn validate(&self, n_features: usize) -> Result<()> {
        let n = self.children_left.len();
        if n == 0 {
            bail!("Tree has no nodes");
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|len| *len != n)
        {
            bail!("Tree arrays must all have {} entries", n);
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                if !self.value[node].is_finite() {
                    bail!("Leaf {} has a non-finite value", node);
                }
                continue;
            }
            // Children are always stored after their parent, which rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    bail!("Node {} has out-of-range child {}", node, child);
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                bail!("Node {} splits on unknown feature {}", node, feature);
            }
            if !self.threshold[node].is_finite() {
                bail!("Node {} has a non-finite threshold", node);
            }
        }
        Ok(())
    }

    fn predict(&self, x: ArrayView1<f64>) -> f64 {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            node = if x[self.feature[node] as usize] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        self.value[node]
    }
}

/// Fitted binary classifier over scaled features.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    /// Additive tree ensemble with a log-odds prior.
    GradientBoosting {
        init_raw: f64,
        learning_rate: f64,
        trees: Vec<RegressionTree>,
    },
    LogisticRegression { coef: Vec<f64>, intercept: f64 },
}

impl Classifier {
    pub fn name(&self) -> &'static str {
        match self {
            Classifier::GradientBoosting { .. } => "gradient_boosting",
            Classifier::LogisticRegression { .. } => "logistic_regression",
        }
    }

    /// Checks the parameters against the expected input width.
    pub fn validate(&self, n_features: usize) -> Result<()> {
        match self {
            Classifier::GradientBoosting {
                init_raw,
                learning_rate,
                trees,
            } => {
                if !init_raw.is_finite() || !learning_rate.is_finite() {
                    bail!("Gradient boosting prior and learning rate must be finite");
                }
                if trees.is_empty() {
                    bail!("Gradient boosting model has no trees");
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(n_features)
                        .map_err(|e| anyhow::anyhow!("Tree {}: {}", i, e))?;
                }
            }
            Classifier::LogisticRegression { coef, intercept } => {
                if coef.len() != n_features {
                    bail!(
                        "Logistic regression has {} coefficients, expected {}",
                        coef.len(),
                        n_features
                    );
                }
                if !intercept.is_finite() || coef.iter().any(|c| !c.is_finite()) {
                    bail!("Logistic regression parameters must be finite");
                }
            }
        }
        Ok(())
    }

    /// Raw decision score (log-odds of the positive class).
    pub fn decision_function(&self, x: ArrayView1<f64>) -> f64 {
        match self {
            Classifier::GradientBoosting {
                init_raw,
                learning_rate,
                trees,
            } => {
                let sum: f64 = trees.iter().map(|tree| tree.predict(x)).sum();
                init_raw + learning_rate * sum
            }
            Classifier::LogisticRegression { coef, intercept } => {
                let logit: f64 = coef.iter().zip(x.iter()).map(|(w, f)| w * f).sum();
                logit + intercept
            }
        }
    }

    /// Probability of the positive ("at risk") class.
    pub fn predict_proba(&self, x: ArrayView1<f64>) -> f64 {
        sigmoid(self.decision_function(x))
    }
}

pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
