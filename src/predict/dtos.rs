use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictTextRequest {
    /// Raw review text. Must be present; `null` or `""` yields the
    /// no-text verdict.
    #[serde(deserialize_with = "Option::deserialize")]
    pub review: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictUrlRequest {
    /// Product page to scrape.
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
