use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::{classifier::ClassifierError, extractor::ScrapeFailure, predict::dtos::ErrorResponse};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Models not loaded")]
    ModelsNotLoaded,

    #[error("{0}")]
    MalformedRequest(String),

    #[error(transparent)]
    Scrape(#[from] ScrapeFailure),

    #[error("{0}")]
    Classifier(#[from] ClassifierError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ModelsNotLoaded => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MalformedRequest(_) | Self::Scrape(_) | Self::Classifier(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
