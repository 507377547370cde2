use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::renderer::{PageRenderer, errors::RenderError};

/// Launch options for one Chromium process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    pub headless: bool,
    pub executable: Option<PathBuf>,
    pub user_agent: String,
    pub window: (u32, u32),
    /// Fixed wait after navigation for client-side rendering to finish.
    pub settle_delay: Duration,
}

impl BrowserSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            headless: config.browser_headless(),
            executable: config.browser_executable().map(PathBuf::from),
            user_agent: config.user_agent().to_string(),
            window: (1920, 1080),
            settle_delay: config.settle_delay(),
        }
    }

    fn launch_config(&self, profile: &Path) -> Result<BrowserConfig, RenderError> {
        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile)
            .window_size(self.window.0, self.window.1)
            .arg("--disable-gpu")
            .arg(format!("--user-agent={}", self.user_agent));
        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(RenderError::Setup)
    }
}

// Fresh Chromium profile directory, removed when dropped.
fn new_profile() -> Result<TempDir, RenderError> {
    tempfile::Builder::new()
        .prefix("reviewcheck-chromium-")
        .tempdir()
        .map_err(|e| RenderError::Setup(format!("failed to create browser profile: {}", e)))
}

/// A running Chromium process bound to a single scrape.
///
/// Every session runs on its own throwaway profile; concurrent sessions
/// never share a profile lock or cookies.
///
/// Call [`BrowserSession::close`] on the normal path. If the session is
/// dropped without it (error, timeout, cancelled request), dropping the
/// inner `Browser` kills the child process and the event loop task is
/// aborted here.
pub struct BrowserSession {
    browser: Browser,
    events: JoinHandle<()>,
    // Declared last so the directory is removed after the process is gone.
    profile: TempDir,
}

impl BrowserSession {
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, RenderError> {
        let profile = new_profile()?;
        debug!("Using browser profile {}", profile.path().display());
        let config = settings.launch_config(profile.path())?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Setup(e.to_string()))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser event loop stopped: {}", e);
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            events,
            profile,
        })
    }

    /// Navigate, wait out the settle delay, and return the rendered DOM.
    pub async fn capture(&self, url: &str, settle_delay: Duration) -> Result<String, RenderError> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| RenderError::Navigation(e.to_string()))?;

        tokio::time::sleep(settle_delay).await;

        page.content()
            .await
            .map_err(|e| RenderError::Navigation(e.to_string()))
    }

    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to reap browser process: {}", e);
        }
        debug!("Removing browser profile {}", self.profile.path().display());
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.events.abort();
    }
}

/// Renders pages in a fresh Chromium instance per call.
#[derive(Debug, Clone)]
pub struct BrowserRenderer {
    settings: BrowserSettings,
}

impl BrowserRenderer {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl PageRenderer for BrowserRenderer {
    #[instrument(skip_all, fields(url = %url, headless = self.settings.headless))]
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        let session = BrowserSession::launch(&self.settings).await?;
        info!(
            "Browser started, waiting {}s for page to render",
            self.settings.settle_delay.as_secs()
        );

        let html = session.capture(url, self.settings.settle_delay).await;
        session.close().await;
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> BrowserSettings {
        BrowserSettings {
            headless: true,
            executable: Some(PathBuf::from("/nonexistent/chromium")),
            user_agent: "test-agent".to_string(),
            window: (1920, 1080),
            settle_delay: Duration::from_millis(0),
        }
    }

    #[test]
    fn test_settings_from_default_config() {
        let settings = BrowserSettings::from_config(&Config::default());
        assert!(!settings.headless);
        assert_eq!(settings.window, (1920, 1080));
        assert_eq!(settings.settle_delay, Duration::from_secs(5));
        assert!(settings.user_agent.contains("Mozilla/5.0"));
    }

    #[test]
    fn test_each_launch_gets_its_own_profile() {
        let settings = settings();
        let first = new_profile().unwrap();
        let second = new_profile().unwrap();
        assert_ne!(first.path(), second.path());

        let first_config = format!("{:?}", settings.launch_config(first.path()).unwrap());
        let second_config = format!("{:?}", settings.launch_config(second.path()).unwrap());
        assert!(first_config.contains(first.path().to_str().unwrap()));
        assert!(second_config.contains(second.path().to_str().unwrap()));
        assert!(!first_config.contains(second.path().to_str().unwrap()));
    }

    #[test]
    fn test_profile_is_removed_on_drop() {
        let profile = new_profile().unwrap();
        let path = profile.path().to_path_buf();
        assert!(path.is_dir());
        drop(profile);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_missing_executable_is_setup_failure() {
        let renderer = BrowserRenderer::new(settings());
        let result = renderer.render("https://www.amazon.com/dp/B000").await;
        assert!(matches!(result, Err(RenderError::Setup(_))));
    }
}
