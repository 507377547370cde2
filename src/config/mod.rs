//! Configuration handling for the service.
//!
//! Everything is read from environment variables with development defaults.
//! `Config::from_env` validates numeric and enum values and reports the
//! first bad one as a `ConfigError`.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Environment variable names. Public so tests and scripts can refer to them.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_MODEL_DIR: &str = "MODEL_DIR";
pub const ENV_RENDERER: &str = "RENDERER";
pub const ENV_BROWSER_HEADLESS: &str = "BROWSER_HEADLESS";
pub const ENV_BROWSER_EXECUTABLE: &str = "BROWSER_EXECUTABLE";
pub const ENV_SETTLE_SECS: &str = "SCRAPE_SETTLE_SECS";
pub const ENV_TIMEOUT_SECS: &str = "SCRAPE_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "SCRAPE_USER_AGENT";
pub const ENV_MAX_CONCURRENT_SCRAPES: &str = "MAX_CONCURRENT_SCRAPES";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_MODEL_DIR: &str = "models";
const DEFAULT_SETTLE_SECS: u64 = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_CONCURRENT_SCRAPES: usize = 2;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Which engine turns a product URL into HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    /// Real Chromium over CDP; runs page scripts.
    Browser,
    /// Plain HTTP GET; server HTML only.
    Http,
}

impl FromStr for RendererKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "browser" | "chrome" | "chromium" => Ok(Self::Browser),
            "http" => Ok(Self::Http),
            other => Err(format!("unknown renderer '{}'", other)),
        }
    }
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    model_dir: PathBuf,
    renderer: RendererKind,
    browser_headless: bool,
    browser_executable: Option<PathBuf>,
    settle_delay: Duration,
    scrape_timeout: Duration,
    user_agent: String,
    max_concurrent_scrapes: usize,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let max_concurrent_scrapes = parse_env(ENV_MAX_CONCURRENT_SCRAPES)?
            .unwrap_or(defaults.max_concurrent_scrapes);
        if max_concurrent_scrapes == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_MAX_CONCURRENT_SCRAPES,
                reason: "must be at least 1".to_string(),
            });
        }

        let scrape_timeout = parse_env(ENV_TIMEOUT_SECS)?
            .map(Duration::from_secs)
            .unwrap_or(defaults.scrape_timeout);
        if scrape_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: ENV_TIMEOUT_SECS,
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            bind_addr: env::var(ENV_BIND_ADDR).unwrap_or(defaults.bind_addr),
            model_dir: env::var(ENV_MODEL_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            renderer: parse_env(ENV_RENDERER)?.unwrap_or(defaults.renderer),
            browser_headless: parse_env(ENV_BROWSER_HEADLESS)?
                .unwrap_or(defaults.browser_headless),
            browser_executable: env::var(ENV_BROWSER_EXECUTABLE)
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            settle_delay: parse_env(ENV_SETTLE_SECS)?
                .map(Duration::from_secs)
                .unwrap_or(defaults.settle_delay),
            scrape_timeout,
            user_agent: env::var(ENV_USER_AGENT).unwrap_or(defaults.user_agent),
            max_concurrent_scrapes,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// Directory holding `tfidf.json` and `model.json`.
    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }
    pub fn renderer(&self) -> RendererKind {
        self.renderer
    }
    pub fn browser_headless(&self) -> bool {
        self.browser_headless
    }
    pub fn browser_executable(&self) -> Option<&Path> {
        self.browser_executable.as_deref()
    }
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }
    /// Upper bound on a single render, settle delay included.
    pub fn scrape_timeout(&self) -> Duration {
        self.scrape_timeout
    }
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
    pub fn max_concurrent_scrapes(&self) -> usize {
        self.max_concurrent_scrapes
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            renderer: RendererKind::Browser,
            // a visible window gets blocked less often
            browser_headless: false,
            browser_executable: None,
            settle_delay: Duration::from_secs(DEFAULT_SETTLE_SECS),
            scrape_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrent_scrapes: DEFAULT_MAX_CONCURRENT_SCRAPES,
        }
    }
}

fn parse_env<T>(field: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(field) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
