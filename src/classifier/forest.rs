use serde::Deserialize;

use crate::classifier::{
    ClassProbabilities, ClassifierError, FeatureVector, ModelLoadError, ProbabilisticClassifier,
};

const FAKE_CLASS: usize = 0;
const GENUINE_CLASS: usize = 1;

/// One fitted decision tree, stored as parallel node arrays.
///
/// Node 0 is the root. A node is a leaf when its left child is negative;
/// internal nodes send `x[feature] <= threshold` to the left child.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".into());
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
            return Err("tree node arrays differ in length".into());
        }

        for node in 0..n {
            let weights = &self.value[node];
            if weights.len() != n_classes {
                return Err(format!("node {} has {} class weights", node, weights.len()));
            }
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(format!("node {} has a negative or non-finite class weight", node));
            }
            if self.children_left[node] < 0 {
                if weights.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {} carries no weight", node));
                }
                continue;
            }
            // Children always follow their parent, which also rules out cycles.
            for child in [self.children_left[node], self.children_right[node]] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {} has invalid child {}", node, child));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {} splits on unknown feature {}", node, feature));
            }
        }
        Ok(())
    }

    fn leaf_weights(&self, x: &FeatureVector) -> &[f64] {
        let mut node = 0usize;
        loop {
            let left = self.children_left[node];
            if left < 0 {
                return &self.value[node];
            }
            node = if x.get(self.feature[node] as usize) <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }
}

/// Averaged class distribution over an ensemble of decision trees.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    classes: Vec<String>,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn validate(&self) -> Result<(), ModelLoadError> {
        if self.classes.len() != 2 {
            return Err(ModelLoadError::Invalid(format!(
                "expected a two-class model, found {} classes",
                self.classes.len()
            )));
        }
        if self.trees.is_empty() {
            return Err(ModelLoadError::Invalid("forest has no trees".into()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|reason| ModelLoadError::Invalid(format!("tree {}: {}", i, reason)))?;
        }
        Ok(())
    }
}

impl ProbabilisticClassifier for RandomForest {
    fn predict_probability(
        &self,
        features: &FeatureVector,
    ) -> Result<ClassProbabilities, ClassifierError> {
        if features.dim() != self.n_features {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.n_features,
                got: features.dim(),
            });
        }

        let mut totals = [0.0f64; 2];
        for tree in &self.trees {
            let weights = tree.leaf_weights(features);
            // leaf sums are positive once validated
            let sum: f64 = weights.iter().sum();
            for (total, weight) in totals.iter_mut().zip(weights) {
                *total += weight / sum;
            }
        }

        let n = self.trees.len() as f64;
        ClassProbabilities::new(totals[FAKE_CLASS] / n, totals[GENUINE_CLASS] / n)
    }
}
