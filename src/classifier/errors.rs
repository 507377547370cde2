use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading the pre-trained artifacts at startup.
#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact: {0}")]
    Invalid(String),

    #[error("vectorizer produces {vectorizer} features but model expects {model}")]
    Incompatible { vectorizer: usize, model: usize },
}

/// Failures during a single inference call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("feature vector has {got} dimensions, model expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("invalid class probabilities ({fake}, {genuine})")]
    InvalidProbabilities { fake: f64, genuine: f64 },
}
