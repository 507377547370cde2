use thiserror::Error;

use crate::renderer::RenderError;

/// Review text scraped from a product page, or why there is none.
pub type ScrapeOutcome = Result<String, ScrapeFailure>;

/// Why a product page produced no review text.
///
/// The `Display` strings are shown to API clients as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeFailure {
    #[error("This scraper is currently designed for Amazon links only.")]
    UnsupportedSite,

    #[error(
        "Error setting up the Chrome Driver. Please ensure you have a good internet connection."
    )]
    DriverSetupFailed,

    #[error(
        "Could not find any reviews. Amazon is likely blocking the request or has changed its website HTML."
    )]
    NoReviewsFound,

    #[error("An error occurred: {0}")]
    ScrapeRuntimeError(String),
}

impl From<RenderError> for ScrapeFailure {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Setup(_) => Self::DriverSetupFailed,
            other => Self::ScrapeRuntimeError(other.to_string()),
        }
    }
}
