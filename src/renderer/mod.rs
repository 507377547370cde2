//! Turning a URL into an HTML string.
//!
//! The review extractor only depends on [`PageRenderer`]; which engine sits
//! behind it is chosen by configuration.

pub mod browser;
pub mod charset;
pub mod errors;
pub mod http;

pub use browser::{BrowserRenderer, BrowserSettings};
pub use errors::RenderError;
pub use http::HttpRenderer;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Config, RendererKind};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Load `url` and return the page HTML.
    async fn render(&self, url: &str) -> Result<String, RenderError>;
}

/// Build the renderer selected by `RENDERER`.
pub fn from_config(config: &Config) -> Result<Arc<dyn PageRenderer>, RenderError> {
    match config.renderer() {
        RendererKind::Browser => Ok(Arc::new(BrowserRenderer::new(
            BrowserSettings::from_config(config),
        ))),
        RendererKind::Http => Ok(Arc::new(HttpRenderer::new(
            config.user_agent(),
            config.scrape_timeout(),
        )?)),
    }
}
