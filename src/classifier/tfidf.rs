use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use crate::classifier::{FeatureExtractor, FeatureVector, ModelLoadError};

// Tokens of two or more word characters, the default the vocabulary was fit with.
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Term-frequency / inverse-document-frequency weighting over a fixed
/// vocabulary.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
}

impl TfidfVectorizer {
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Self {
        Self {
            vocabulary,
            idf,
            sublinear_tf: false,
            norm: default_norm(),
        }
    }

    pub fn with_sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.sublinear_tf = sublinear_tf;
        self
    }

    pub fn with_norm(mut self, norm: Option<Norm>) -> Self {
        self.norm = norm;
        self
    }

    pub fn validate(&self) -> Result<(), ModelLoadError> {
        if self.idf.is_empty() {
            return Err(ModelLoadError::Invalid("vectorizer has no idf weights".into()));
        }
        if let Some((term, index)) = self
            .vocabulary
            .iter()
            .find(|(_, index)| **index >= self.idf.len())
        {
            return Err(ModelLoadError::Invalid(format!(
                "term '{}' maps to index {} beyond {} idf weights",
                term,
                index,
                self.idf.len()
            )));
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err(ModelLoadError::Invalid("non-finite idf weight".into()));
        }
        Ok(())
    }
}

impl FeatureExtractor for TfidfVectorizer {
    fn transform(&self, text: &str) -> FeatureVector {
        let lowered = text.to_lowercase();

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in TOKEN_REGEX.find_iter(&lowered) {
            if let Some(&index) = self.vocabulary.get(token.as_str()) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .filter_map(|(index, tf)| {
                let idf = *self.idf.get(index)?;
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                Some((index, tf * idf))
            })
            .collect();

        let length = match self.norm {
            Some(Norm::L2) => entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt(),
            Some(Norm::L1) => entries.iter().map(|(_, w)| w.abs()).sum::<f64>(),
            None => 1.0,
        };
        if length > 0.0 {
            for (_, weight) in &mut entries {
                *weight /= length;
            }
        }

        FeatureVector::new(self.idf.len(), entries)
    }

    fn n_features(&self) -> usize {
        self.idf.len()
    }
}
