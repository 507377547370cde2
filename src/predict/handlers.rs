use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;
use tracing::info;

use crate::{
    app_state::AppState,
    classifier::ReviewClassifier,
    predict::{
        dtos::{ErrorResponse, PredictTextRequest, PredictUrlRequest},
        errors::ApiError,
    },
    verdict::Verdict,
};

fn loaded_classifier(state: &AppState) -> Result<Arc<ReviewClassifier>, ApiError> {
    state.classifier.clone().ok_or(ApiError::ModelsNotLoaded)
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::MalformedRequest(rejection.body_text()))
}

#[utoipa::path(
    post,
    path = "/predict",
    tag = "predict",
    request_body = PredictTextRequest,
    responses(
        (status = 200, description = "Verdict for the submitted text", body = Verdict),
        (status = 400, description = "Malformed request or inference failure", body = ErrorResponse),
        (status = 500, description = "Models not loaded", body = ErrorResponse)
    )
)]
pub async fn predict_text(
    State(state): State<AppState>,
    payload: Result<Json<PredictTextRequest>, JsonRejection>,
) -> Result<Json<Verdict>, ApiError> {
    let classifier = loaded_classifier(&state)?;
    let request = parse_body(payload)?;

    let verdict = classifier.assess(request.review.as_deref())?;
    Ok(Json(verdict))
}

#[utoipa::path(
    post,
    path = "/predict_url",
    tag = "predict",
    request_body = PredictUrlRequest,
    responses(
        (status = 200, description = "Verdict for the reviews on the page", body = Verdict),
        (status = 400, description = "Malformed request or scrape failure", body = ErrorResponse),
        (status = 500, description = "Models not loaded", body = ErrorResponse)
    )
)]
pub async fn predict_url(
    State(state): State<AppState>,
    payload: Result<Json<PredictUrlRequest>, JsonRejection>,
) -> Result<Json<Verdict>, ApiError> {
    let classifier = loaded_classifier(&state)?;
    let request = parse_body(payload)?;

    info!("Scraping reviews from {}", request.url);
    let reviews = state.extractor.extract(&request.url).await?;

    let verdict = classifier.assess(Some(&reviews))?;
    Ok(Json(verdict))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        classifier::{
            ClassProbabilities, ClassifierError, FeatureExtractor, FeatureVector,
            ProbabilisticClassifier,
        },
        extractor::ReviewExtractor,
        renderer::MockPageRenderer,
    };
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::post,
    };
    use std::time::Duration;
    use tower::ServiceExt;

    struct Empty;

    impl FeatureExtractor for Empty {
        fn transform(&self, _text: &str) -> FeatureVector {
            FeatureVector::new(1, vec![])
        }

        fn n_features(&self) -> usize {
            1
        }
    }

    struct Failing;

    impl ProbabilisticClassifier for Failing {
        fn predict_probability(
            &self,
            _features: &FeatureVector,
        ) -> Result<ClassProbabilities, ClassifierError> {
            Err(ClassifierError::DimensionMismatch {
                expected: 2,
                got: 1,
            })
        }
    }

    fn create_test_app(classifier: Option<ReviewClassifier>, renderer: MockPageRenderer) -> Router {
        let extractor = ReviewExtractor::new(Arc::new(renderer), 1, Duration::from_secs(1));
        let state = AppState::new(classifier.map(Arc::new), extractor);

        Router::new()
            .route("/predict", post(predict_text))
            .route("/predict_url", post(predict_url))
            .with_state(state)
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn error_message(response: axum::response::Response) -> String {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body_bytes).unwrap();
        error.error
    }

    #[tokio::test]
    async fn test_models_not_loaded_checked_before_body() {
        let app = create_test_app(None, MockPageRenderer::new());

        let response = app
            .clone()
            .oneshot(json_request("/predict", "not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_message(response).await, "Models not loaded");

        let response = app
            .oneshot(json_request("/predict_url", r#"{"url": "https://amazon.com/x"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_classifier_failure_is_client_error() {
        let classifier = ReviewClassifier::new(Empty, Failing);
        let app = create_test_app(Some(classifier), MockPageRenderer::new());

        let response = app
            .oneshot(json_request("/predict", r#"{"review": "anything"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(response).await.contains("dimensions"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let classifier = ReviewClassifier::new(Empty, Failing);
        let app = create_test_app(Some(classifier), MockPageRenderer::new());

        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .body(Body::from(r#"{"review": "x"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unsupported_url_skips_renderer() {
        let mut renderer = MockPageRenderer::new();
        renderer.expect_render().times(0);
        let classifier = ReviewClassifier::new(Empty, Failing);
        let app = create_test_app(Some(classifier), renderer);

        let response = app
            .oneshot(json_request("/predict_url", r#"{"url": "https://ebay.com/itm/1"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_message(response).await,
            "This scraper is currently designed for Amazon links only."
        );
    }
}
