pub mod logger;
pub mod login;
pub mod reauth;
pub mod settings;
pub mod tool_executor;
