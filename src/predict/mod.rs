pub mod dtos;
pub mod errors;
pub mod handlers;

pub use dtos::{ErrorResponse, PredictTextRequest, PredictUrlRequest};
pub use errors::ApiError;
pub use handlers::{predict_text, predict_url};
