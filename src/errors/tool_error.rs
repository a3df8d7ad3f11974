use crate::errors::DrugInfoError;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    InvalidParams,
    Config,
    Timeout,
    Upstream,
    Internal,
}

/// Failure surfaced to the tool host. Carries the original message text of
/// whatever went wrong underneath; client error variants stop here.
#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            hint: None,
            details: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, "INVALID_PARAMS", message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Config, "CONFIG", message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, "TIMEOUT", message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Upstream, "REQUEST_FAILED", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, "INTERNAL", message)
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}

impl From<DrugInfoError> for ToolError {
    fn from(err: DrugInfoError) -> Self {
        let message = err.to_string();
        match err {
            DrugInfoError::Config(_) => ToolError::config(message).with_hint(
                "Set EDB_BASE_URL (or EDB_LOGIN_URL) for the drug-information API.",
            ),
            DrugInfoError::InvalidArgument(_) => ToolError::invalid_params(message),
            DrugInfoError::Transport { timeout: true, .. } => ToolError::timeout(message),
            DrugInfoError::Http { status, .. } => {
                ToolError::upstream(message).with_details(serde_json::json!({"status": status}))
            }
            DrugInfoError::Unauthorized | DrugInfoError::Transport { .. } => {
                ToolError::upstream(message)
            }
        }
    }
}
