use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    /// The rendering engine itself could not be started.
    #[error("renderer setup failed: {0}")]
    Setup(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("page did not render within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("http error {0}")]
    Http(reqwest::StatusCode),

    #[error("body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("unsupported content-type: {0}")]
    UnsupportedContentType(String),

    #[error("charset error: {0}")]
    Charset(String),

    #[error("io error: {0}")]
    Io(String),
}

impl RenderError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Navigation("request timed out".to_string())
        } else if err.is_redirect() {
            Self::Navigation("too many redirects".to_string())
        } else if let Some(status) = err.status() {
            Self::Http(status)
        } else if err.is_builder() {
            Self::Setup(err.to_string())
        } else {
            Self::Navigation(err.to_string())
        }
    }
}
