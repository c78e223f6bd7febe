//! Exported crop classifier
//!
//! The training pipeline exports either a linear model (one weight row per
//! class) or a forest of decision trees flattened into node arrays. Both map a
//! single scaled row to exactly one class index.

use serde::{Deserialize, Serialize};

use super::InferenceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    /// Arg-max over `intercept + w · x`. A single weight row is a binary
    /// model: class 1 when the score is positive, else class 0.
    Linear {
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    /// Arg-max of the class distributions averaged over all trees, as
    /// scikit-learn's `predict` does. Ties go to the lowest class index.
    Forest {
        n_features: usize,
        n_classes: usize,
        trees: Vec<DecisionTree>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Node 0 is the root
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go left when `x[feature] <= threshold`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights at the leaf (sample counts or fractions)
    Distribution {
        value: Vec<f64>,
    },
    /// A pure leaf; counts as all weight on `class`
    Leaf {
        class: usize,
    },
}

impl Classifier {
    /// Expected row width, if the model is well formed
    pub fn n_features(&self) -> Option<usize> {
        match self {
            Classifier::Linear { coefficients, .. } => coefficients.first().map(Vec::len),
            Classifier::Forest { n_features, .. } => Some(*n_features),
        }
    }

    pub fn n_classes(&self) -> usize {
        match self {
            Classifier::Linear { coefficients, .. } if coefficients.len() == 1 => 2,
            Classifier::Linear { coefficients, .. } => coefficients.len(),
            Classifier::Forest { n_classes, .. } => *n_classes,
        }
    }

    pub fn predict(&self, row: &[f64]) -> Result<usize, InferenceError> {
        match self {
            Classifier::Linear {
                coefficients,
                intercepts,
            } => predict_linear(coefficients, intercepts, row),
            Classifier::Forest {
                n_features,
                n_classes,
                trees,
            } => {
                if row.len() != *n_features {
                    return Err(InferenceError::ClassifierWidth {
                        expected: *n_features,
                        actual: row.len(),
                    });
                }
                if trees.is_empty() || *n_classes == 0 {
                    return Err(InferenceError::MalformedClassifier(
                        "forest has no trees or no classes".to_string(),
                    ));
                }

                let mut totals = vec![0.0; *n_classes];
                for (i, tree) in trees.iter().enumerate() {
                    let proba = tree.predict_proba(row, *n_classes).map_err(|e| {
                        InferenceError::MalformedClassifier(format!("tree {}: {}", i, e))
                    })?;
                    for (total, p) in totals.iter_mut().zip(proba) {
                        *total += p;
                    }
                }

                Ok(arg_max(totals.into_iter()))
            }
        }
    }
}

fn predict_linear(
    coefficients: &[Vec<f64>],
    intercepts: &[f64],
    row: &[f64],
) -> Result<usize, InferenceError> {
    if coefficients.is_empty() || coefficients.len() != intercepts.len() {
        return Err(InferenceError::MalformedClassifier(format!(
            "{} weight rows but {} intercepts",
            coefficients.len(),
            intercepts.len()
        )));
    }

    let mut scores = Vec::with_capacity(coefficients.len());
    for (weights, intercept) in coefficients.iter().zip(intercepts) {
        if weights.len() != row.len() {
            return Err(InferenceError::ClassifierWidth {
                expected: weights.len(),
                actual: row.len(),
            });
        }
        let dot: f64 = weights.iter().zip(row).map(|(w, x)| w * x).sum();
        scores.push(intercept + dot);
    }

    if scores.len() == 1 {
        return Ok(usize::from(scores[0] > 0.0));
    }
    Ok(arg_max(scores.into_iter()))
}

/// Index of the largest value, first one on ties
fn arg_max(values: impl Iterator<Item = f64>) -> usize {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, v) in values.enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best.0
}

impl DecisionTree {
    /// Normalized class distribution of the leaf `row` lands in
    pub fn predict_proba(&self, row: &[f64], n_classes: usize) -> Result<Vec<f64>, String> {
        match self.leaf(row)? {
            TreeNode::Leaf { class } => {
                let mut proba = vec![0.0; n_classes];
                let slot = proba
                    .get_mut(*class)
                    .ok_or_else(|| format!("leaf class {} of {}", class, n_classes))?;
                *slot = 1.0;
                Ok(proba)
            }
            TreeNode::Distribution { value } => {
                if value.len() != n_classes {
                    return Err(format!("leaf has {} values for {} classes", value.len(), n_classes));
                }
                let total: f64 = value.iter().sum();
                if !(total.is_finite() && total > 0.0) || value.iter().any(|v| *v < 0.0) {
                    return Err("leaf values must be non-negative with a positive sum".to_string());
                }
                Ok(value.iter().map(|v| v / total).collect())
            }
            TreeNode::Split { .. } => Err("walk ended on a split".to_string()),
        }
    }

    fn leaf(&self, row: &[f64]) -> Result<&TreeNode, String> {
        let mut index = 0;
        // A well formed tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(index) {
                Some(node @ (TreeNode::Leaf { .. } | TreeNode::Distribution { .. })) => {
                    return Ok(node)
                }
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row
                        .get(*feature)
                        .ok_or_else(|| format!("split on missing feature {}", feature))?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                None => return Err(format!("node {} does not exist", index)),
            }
        }
        Err("tree contains a cycle".to_string())
    }
}
