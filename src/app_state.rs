use std::sync::Arc;

use crate::{classifier::ReviewClassifier, extractor::ReviewExtractor};

#[derive(Clone)]
pub struct AppState {
    /// `None` when the artifacts failed to load; prediction routes then
    /// answer 500 while the process keeps serving.
    pub classifier: Option<Arc<ReviewClassifier>>,
    pub extractor: Arc<ReviewExtractor>,
}

impl AppState {
    pub fn new(classifier: Option<Arc<ReviewClassifier>>, extractor: ReviewExtractor) -> Self {
        Self {
            classifier,
            extractor: Arc::new(extractor),
        }
    }

    pub fn models_loaded(&self) -> bool {
        self.classifier.is_some()
    }
}
