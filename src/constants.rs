pub mod network {
    pub const DEFAULT_TIMEOUT_S: u64 = 15;
    pub const EXPORT_TIMEOUT_S: u64 = 30;
    pub const USER_AGENT: &str = concat!("druginfo-mcp/", env!("CARGO_PKG_VERSION"));
}

pub mod api {
    pub const PATH_PREFIX: &str = "/v1/druginfo";
    pub const TOOL_PREFIX: &str = "druginfo_";
    pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
    pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
}

pub mod env {
    pub const BASE_URL: &str = "EDB_BASE_URL";
    pub const LOGIN_URL: &str = "EDB_LOGIN_URL";
    pub const TOKEN: &str = "EDB_TOKEN";
    pub const USERNAME: &str = "EDB_USERNAME";
    pub const PASSWORD: &str = "EDB_PASSWORD";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

pub mod limits {
    pub const ERROR_BODY_LOG_BYTES: usize = 512;
    pub const SUGGESTION_LIMIT: usize = 3;
}
