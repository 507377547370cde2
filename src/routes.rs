use axum::{
    Json, Router,
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::error;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    app_state::AppState,
    health::{self, HealthResponse},
    predict::{self, ErrorResponse, PredictTextRequest, PredictUrlRequest},
    verdict::Verdict,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        predict::handlers::predict_text,
        predict::handlers::predict_url
    ),
    components(schemas(
        HealthResponse,
        PredictTextRequest,
        PredictUrlRequest,
        Verdict,
        ErrorResponse
    )),
    tags(
        (name = "predict", description = "Genuine/fake review prediction"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Every route, the OpenAPI UI, and the shared middleware stack.
pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/predict", post(predict::predict_text))
        .route("/predict_url", post(predict::predict_url))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
}

/// Turns a handler panic into the same JSON error shape as every other
/// client-facing failure.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown error".to_string()
    };
    error!("Handler panicked: {}", message);

    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
}
