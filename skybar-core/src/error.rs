use thiserror::Error;

/// Everything that can keep the forecast line from being printed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no API key configured")]
    MissingKey,

    #[error("request timed out")]
    Timeout,

    #[error("network failure: {0}")]
    Network(String),

    #[error("provider answered with HTTP status {0}")]
    HttpStatus(u16),

    #[error("provider returned result code {code}: {message}")]
    Api { code: String, message: String },

    #[error("forecast response contained no items")]
    NoData,

    #[error("unexpected failure: {0}")]
    Fatal(String),
}

impl FetchError {
    /// Short diagnostic printed in place of the weather line.
    pub fn token(&self) -> String {
        match self {
            FetchError::MissingKey => "KEY_ERR".to_string(),
            FetchError::Timeout => "TIMEOUT".to_string(),
            FetchError::Network(_) => "NET_FAIL".to_string(),
            FetchError::HttpStatus(status) => format!("HTTP_{status}"),
            FetchError::Api { code, .. } => format!("API_ERR_{code}"),
            FetchError::NoData => "NO_DATA".to_string(),
            FetchError::Fatal(_) => "FATAL_ERR".to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus(status.as_u16())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Fatal(format!("malformed forecast JSON: {err}"))
    }
}
