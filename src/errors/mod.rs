mod client_error;
mod mcp_error;
mod tool_error;

pub use client_error::DrugInfoError;
pub use mcp_error::{McpError, RpcCode};
pub use tool_error::{ToolError, ToolErrorKind};
