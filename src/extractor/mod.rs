pub mod outcome;
pub mod reviews;
pub mod sites;

#[cfg(test)]
mod tests;

pub use outcome::{ScrapeFailure, ScrapeOutcome};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use crate::renderer::{PageRenderer, RenderError};

/// Scrapes the review text off a single product page.
pub struct ReviewExtractor {
    renderer: Arc<dyn PageRenderer>,
    permits: Semaphore,
    timeout: Duration,
}

impl ReviewExtractor {
    /// `max_concurrent` bounds how many renders (browser processes) run at
    /// once; `timeout` bounds each one.
    pub fn new(renderer: Arc<dyn PageRenderer>, max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            renderer,
            permits: Semaphore::new(max_concurrent.max(1)),
            timeout,
        }
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn extract(&self, url: &str) -> ScrapeOutcome {
        // 1. Reject before touching the network
        if !sites::is_supported(url) {
            info!("Rejecting unsupported site");
            return Err(ScrapeFailure::UnsupportedSite);
        }

        // 2. Render the page
        let html = self.render(url).await.inspect_err(|failure| {
            warn!("Scrape failed: {}", failure);
        })?;

        // 3. Pull review bodies out of the DOM
        let reviews = reviews::join_reviews(&html).ok_or(ScrapeFailure::NoReviewsFound)?;
        info!("Collected {} bytes of review text", reviews.len());
        Ok(reviews)
    }

    async fn render(&self, url: &str) -> Result<String, ScrapeFailure> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| ScrapeFailure::ScrapeRuntimeError(e.to_string()))?;

        // Dropping the render future on timeout also tears down its browser session
        match tokio::time::timeout(self.timeout, self.renderer.render(url)).await {
            Ok(result) => result.map_err(ScrapeFailure::from),
            Err(_) => Err(RenderError::Timeout(self.timeout).into()),
        }
    }
}
