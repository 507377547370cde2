//! Inference over the pre-trained review classifier.
//!
//! Two artifacts are produced offline and loaded once at startup: a TF-IDF
//! vectorizer (`tfidf.json`) and a random forest (`model.json`). Both are
//! immutable after load, so a single [`ReviewClassifier`] is shared across
//! request handlers without locking.

pub mod errors;
pub mod forest;
pub mod tfidf;

pub use errors::{ClassifierError, ModelLoadError};
pub use forest::RandomForest;
pub use tfidf::TfidfVectorizer;

use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{info, instrument};

use crate::normalizer::normalize;
use crate::verdict::{self, Verdict};

pub const VECTORIZER_FILE: &str = "tfidf.json";
pub const MODEL_FILE: &str = "model.json";

const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Sparse numeric representation of a text over a fixed vocabulary.
///
/// Entries are kept sorted by index; absent indices are zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn new(dim: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|(index, _)| *index < dim);
        entries.sort_by_key(|(index, _)| *index);
        entries.dedup_by_key(|(index, _)| *index);
        Self { dim, entries }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }
}

/// `(p_fake, p_genuine)` from a two-class model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    fake: f64,
    genuine: f64,
}

impl ClassProbabilities {
    pub fn new(fake: f64, genuine: f64) -> Result<Self, ClassifierError> {
        let in_range = |p: f64| p.is_finite() && (0.0..=1.0).contains(&p);
        if !in_range(fake)
            || !in_range(genuine)
            || (fake + genuine - 1.0).abs() > PROBABILITY_TOLERANCE
        {
            return Err(ClassifierError::InvalidProbabilities { fake, genuine });
        }
        Ok(Self { fake, genuine })
    }

    pub fn fake(&self) -> f64 {
        self.fake
    }

    pub fn genuine(&self) -> f64 {
        self.genuine
    }
}

/// Text to feature vector, fitted offline.
pub trait FeatureExtractor: Send + Sync {
    fn transform(&self, text: &str) -> FeatureVector;

    /// Width of every vector this extractor produces.
    fn n_features(&self) -> usize;
}

/// Feature vector to class probabilities, fitted offline.
pub trait ProbabilisticClassifier: Send + Sync {
    fn predict_probability(
        &self,
        features: &FeatureVector,
    ) -> Result<ClassProbabilities, ClassifierError>;
}

/// The loaded extractor/classifier pair.
pub struct ReviewClassifier {
    extractor: Box<dyn FeatureExtractor>,
    model: Box<dyn ProbabilisticClassifier>,
}

impl ReviewClassifier {
    pub fn new(
        extractor: impl FeatureExtractor + 'static,
        model: impl ProbabilisticClassifier + 'static,
    ) -> Self {
        Self {
            extractor: Box::new(extractor),
            model: Box::new(model),
        }
    }

    /// Load `tfidf.json` and `model.json` from `model_dir`.
    #[instrument(skip_all, fields(model_dir = %model_dir.display()))]
    pub fn load(model_dir: &Path) -> Result<Self, ModelLoadError> {
        let vectorizer: TfidfVectorizer = read_artifact(&model_dir.join(VECTORIZER_FILE))?;
        vectorizer.validate()?;

        let forest: RandomForest = read_artifact(&model_dir.join(MODEL_FILE))?;
        forest.validate()?;

        if vectorizer.n_features() != forest.n_features() {
            return Err(ModelLoadError::Incompatible {
                vectorizer: vectorizer.n_features(),
                model: forest.n_features(),
            });
        }

        info!(
            "Loaded classifier artifacts ({} features, {} trees)",
            vectorizer.n_features(),
            forest.n_trees()
        );
        Ok(Self::new(vectorizer, forest))
    }

    /// Probabilities for text that has already been normalized.
    pub fn predict(&self, normalized: &str) -> Result<ClassProbabilities, ClassifierError> {
        let features = self.extractor.transform(normalized);
        self.model.predict_probability(&features)
    }

    /// Full text-to-verdict pipeline.
    ///
    /// Absent or empty input never reaches the model.
    pub fn assess(&self, text: Option<&str>) -> Result<Verdict, ClassifierError> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return Ok(Verdict::no_text());
        };
        let probabilities = self.predict(&normalize(text))?;
        Ok(verdict::compose(probabilities))
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ModelLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
