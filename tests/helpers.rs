use async_trait::async_trait;
use axum::Router;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use reviewcheck::{
    app_state::AppState,
    classifier::{RandomForest, ReviewClassifier, TfidfVectorizer},
    extractor::ReviewExtractor,
    renderer::{PageRenderer, RenderError},
    routes,
};

/// Two stumps: "love" pushes towards genuine, "fake" towards fake.
const VECTORIZER_JSON: &str = r#"{
    "vocabulary": {"love": 0, "great": 1, "product": 2, "fake": 3, "terrible": 4},
    "idf": [1.0, 1.2, 1.1, 1.5, 1.4]
}"#;

const MODEL_JSON: &str = r#"{
    "classes": ["CG", "OR"],
    "n_features": 5,
    "trees": [
        {
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [0, -2, -2],
            "threshold": [0.0, -2.0, -2.0],
            "value": [[7.0, 13.0], [6.0, 4.0], [1.0, 9.0]]
        },
        {
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [3, -2, -2],
            "threshold": [0.0, -2.0, -2.0],
            "value": [[11.0, 9.0], [2.0, 8.0], [9.0, 1.0]]
        }
    ]
}"#;

pub fn test_classifier() -> ReviewClassifier {
    let vectorizer: TfidfVectorizer = serde_json::from_str(VECTORIZER_JSON).unwrap();
    vectorizer.validate().unwrap();
    let forest: RandomForest = serde_json::from_str(MODEL_JSON).unwrap();
    forest.validate().unwrap();
    ReviewClassifier::new(vectorizer, forest)
}

/// Serves the same HTML for every URL and counts calls.
pub struct StaticRenderer {
    html: Result<String, String>,
    pub calls: AtomicUsize,
}

impl StaticRenderer {
    pub fn page(html: &str) -> Self {
        Self {
            html: Ok(html.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn broken(reason: &str) -> Self {
        Self {
            html: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PageRenderer for StaticRenderer {
    async fn render(&self, _url: &str) -> Result<String, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.html.clone().map_err(RenderError::Setup)
    }
}

pub fn test_app(classifier: Option<ReviewClassifier>, renderer: Arc<StaticRenderer>) -> Router {
    let extractor = ReviewExtractor::new(renderer, 2, Duration::from_secs(5));
    routes::router(AppState::new(classifier.map(Arc::new), extractor))
}
