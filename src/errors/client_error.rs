use serde_json::Value;
use thiserror::Error;

/// Errors raised by the drug-information client layer.
///
/// `Unauthorized` is reserved for HTTP 401 and is the only variant the
/// tool layer recovers from (by re-login and a single replay).
#[derive(Debug, Clone, Error)]
pub enum DrugInfoError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unauthorized (401)")]
    Unauthorized,

    #[error("request failed: {status} {body}")]
    Http { status: u16, body: Value },

    #[error("request failed: {message}")]
    Transport { timeout: bool, message: String },
}

impl DrugInfoError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<reqwest::Error> for DrugInfoError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            timeout: err.is_timeout(),
            message: err.to_string(),
        }
    }
}
