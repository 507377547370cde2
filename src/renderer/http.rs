use async_trait::async_trait;
use reqwest::{
    Client, ClientBuilder,
    header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::renderer::{PageRenderer, charset::decode_body, errors::RenderError};

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB

/// Fetches raw server HTML without running scripts.
///
/// Cheaper than a browser but only sees what the server sends before any
/// client-side rendering.
#[derive(Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, RenderError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .default_headers(headers)
            .build()
            .map_err(|e| RenderError::Setup(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    #[instrument(skip_all, fields(url = %url))]
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        let parsed_url = url::Url::parse(url)?;

        let response = self
            .client
            .get(parsed_url)
            .send()
            .await
            .map_err(RenderError::from_reqwest_error)?;

        if let Some(content_length) = response.content_length()
            && content_length > MAX_BODY_SIZE
        {
            return Err(RenderError::BodyTooLarge(content_length));
        }

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Http(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
            return Err(RenderError::UnsupportedContentType(content_type));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RenderError::Io(e.to_string()))?;

        // Content-Length may be missing or wrong
        if body.len() as u64 > MAX_BODY_SIZE {
            return Err(RenderError::BodyTooLarge(body.len() as u64));
        }

        debug!("Fetched {} bytes ({})", body.len(), content_type);
        decode_body(&content_type, &body)
    }
}
