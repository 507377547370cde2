use async_trait::async_trait;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::extractor::{ReviewExtractor, ScrapeFailure};
use crate::renderer::{MockPageRenderer, PageRenderer, RenderError};

const PRODUCT_URL: &str = "https://www.amazon.com/dp/B08N5WRWNW";

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{}", name))
        .expect("Failed to read test fixture")
}

fn extractor_with(renderer: impl PageRenderer + 'static) -> ReviewExtractor {
    ReviewExtractor::new(Arc::new(renderer), 2, Duration::from_secs(5))
}

fn serving(html: String) -> MockPageRenderer {
    let mut renderer = MockPageRenderer::new();
    renderer
        .expect_render()
        .times(1)
        .returning(move |_| Ok(html.clone()));
    renderer
}

#[tokio::test]
async fn test_unsupported_site_never_renders() {
    let mut renderer = MockPageRenderer::new();
    renderer.expect_render().times(0);
    let extractor = extractor_with(renderer);

    let result = extractor
        .extract("https://www.flipkart.com/blender/p/itm123")
        .await;
    assert_eq!(result, Err(ScrapeFailure::UnsupportedSite));
}

#[tokio::test]
async fn test_product_page_uses_primary_selector() {
    let extractor = extractor_with(serving(fixture("product_page.html")));

    let text = extractor.extract(PRODUCT_URL).await.unwrap();
    assert_eq!(
        text,
        "Crushes ice in seconds and cleans up easily. Very loud but it does the job."
    );
    assert!(!text.contains("cr:expand"));
    assert!(!text.contains("max-height"));
}

#[tokio::test]
async fn test_reviews_page_falls_back_to_secondary_selector() {
    let extractor = extractor_with(serving(fixture("reviews_page.html")));

    let text = extractor
        .extract("https://www.amazon.com/product-reviews/B08N5WRWNW")
        .await
        .unwrap();
    assert_eq!(
        text,
        "Best purchase this year. Arrived damaged, replacement was fine."
    );
}

#[tokio::test]
async fn test_blocked_page_has_no_reviews() {
    let extractor = extractor_with(serving(fixture("blocked.html")));

    let result = extractor.extract("https://amzn.in/d/4xYz").await;
    assert_eq!(result, Err(ScrapeFailure::NoReviewsFound));
}

#[tokio::test]
async fn test_renderer_setup_failure() {
    let mut renderer = MockPageRenderer::new();
    renderer
        .expect_render()
        .returning(|_| Err(RenderError::Setup("chromium not found".into())));
    let extractor = extractor_with(renderer);

    let result = extractor.extract(PRODUCT_URL).await;
    assert_eq!(result, Err(ScrapeFailure::DriverSetupFailed));
}

#[tokio::test]
async fn test_navigation_failure_is_runtime_error() {
    let mut renderer = MockPageRenderer::new();
    renderer
        .expect_render()
        .returning(|_| Err(RenderError::Navigation("net::ERR_NAME_NOT_RESOLVED".into())));
    let extractor = extractor_with(renderer);

    match extractor.extract(PRODUCT_URL).await {
        Err(ScrapeFailure::ScrapeRuntimeError(message)) => {
            assert!(message.contains("ERR_NAME_NOT_RESOLVED"));
        }
        other => panic!("Expected runtime error, got {:?}", other),
    }
}

struct SlowRenderer {
    delay: Duration,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl SlowRenderer {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PageRenderer for SlowRenderer {
    async fn render(&self, _url: &str) -> Result<String, RenderError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(r#"<div data-hook="review-collapsed">ok</div>"#.to_string())
    }
}

#[tokio::test]
async fn test_render_timeout() {
    let renderer = SlowRenderer::new(Duration::from_secs(5));
    let extractor = ReviewExtractor::new(Arc::new(renderer), 1, Duration::from_millis(50));

    match extractor.extract(PRODUCT_URL).await {
        Err(ScrapeFailure::ScrapeRuntimeError(message)) => {
            assert!(message.contains("did not render"));
        }
        other => panic!("Expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_renders_are_bounded() {
    let renderer = Arc::new(SlowRenderer::new(Duration::from_millis(20)));
    let extractor = ReviewExtractor::new(renderer.clone(), 1, Duration::from_secs(5));

    let results =
        futures::future::join_all((0..4).map(|_| extractor.extract(PRODUCT_URL))).await;

    assert!(results.iter().all(|r| r.as_deref() == Ok("ok")));
    assert_eq!(renderer.peak.load(Ordering::SeqCst), 1);
}
