//! JSON-RPC errors written back to the MCP host.

use super::{ToolError, ToolErrorKind};
use thiserror::Error;

/// Error codes this server replies with. All but `Timeout` are the codes
/// reserved by JSON-RPC 2.0; `Timeout` sits in the server-defined range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcCode {
    Parse,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    Internal,
    Timeout,
}

impl RpcCode {
    pub const fn value(self) -> i32 {
        match self {
            Self::Parse => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::Internal => -32603,
            Self::Timeout => -32001,
        }
    }
}

impl From<ToolErrorKind> for RpcCode {
    fn from(kind: ToolErrorKind) -> Self {
        match kind {
            ToolErrorKind::InvalidParams => Self::InvalidParams,
            ToolErrorKind::Timeout => Self::Timeout,
            ToolErrorKind::Config | ToolErrorKind::Upstream | ToolErrorKind::Internal => {
                Self::Internal
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct McpError {
    pub code: RpcCode,
    pub message: String,
}

impl McpError {
    pub fn new(code: RpcCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn parse_error() -> Self {
        Self::new(RpcCode::Parse, "Parse error")
    }

    pub fn invalid_request() -> Self {
        Self::new(RpcCode::InvalidRequest, "Invalid request")
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(RpcCode::MethodNotFound, format!("Method not found: {}", method))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(RpcCode::InvalidParams, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(RpcCode::Internal, message)
    }
}

/// Keeps the tool's message verbatim; a hint goes on its own line.
impl From<&ToolError> for McpError {
    fn from(err: &ToolError) -> Self {
        let message = match &err.hint {
            Some(hint) => format!("{}\nHint: {}", err.message, hint),
            None => err.message.clone(),
        };
        Self::new(err.kind.into(), message)
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        Self::from(&err)
    }
}
