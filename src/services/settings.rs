use crate::constants::env;
use crate::errors::DrugInfoError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Key/value lookup behind [`Settings`]. Implementations must return the
/// current value on every call; nothing is cached at this layer.
pub trait ConfigSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }
}

impl ConfigSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Snapshot taken at the start of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub token: Option<String>,
}

/// Process-wide configuration, built once at startup and shared by reference.
///
/// Values are read from the source on every call. The only thing held here is
/// the session token obtained by re-login, which takes precedence over
/// `EDB_TOKEN`.
pub struct Settings {
    source: Arc<dyn ConfigSource>,
    session_token: RwLock<Option<String>>,
}

impl Settings {
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        Self {
            source,
            session_token: RwLock::new(None),
        }
    }

    pub fn from_env() -> Self {
        Self::new(Arc::new(EnvSource))
    }

    fn lookup(&self, key: &str, trim: bool) -> Option<String> {
        let raw = self.source.get(key)?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(if trim { trimmed.to_string() } else { raw })
    }

    pub fn base_url(&self) -> Result<String, DrugInfoError> {
        resolve_origin(
            self.lookup(env::BASE_URL, true).as_deref(),
            self.lookup(env::LOGIN_URL, true).as_deref(),
        )
    }

    pub fn token(&self) -> Option<String> {
        let session = self
            .session_token
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|err| err.into_inner().clone());
        session.or_else(|| self.lookup(env::TOKEN, true))
    }

    pub fn set_session_token(&self, token: &str) {
        let mut guard = self
            .session_token
            .write()
            .unwrap_or_else(|err| err.into_inner());
        *guard = Some(token.to_string());
    }

    pub fn login_url(&self) -> Option<String> {
        self.lookup(env::LOGIN_URL, true)
    }

    pub fn credentials(&self) -> Option<Credentials> {
        Some(Credentials {
            username: self.lookup(env::USERNAME, true)?,
            password: self.lookup(env::PASSWORD, false)?,
        })
    }

    pub fn resolve(&self) -> Result<ResolvedConfig, DrugInfoError> {
        Ok(ResolvedConfig {
            base_url: self.base_url()?,
            token: self.token(),
        })
    }
}

/// Picks the API origin: the explicit base URL (trailing `/` stripped) or,
/// failing that, `scheme://host` cut from the login URL.
pub fn resolve_origin(base_url: Option<&str>, login_url: Option<&str>) -> Result<String, DrugInfoError> {
    if let Some(base) = base_url {
        let base = base.trim().trim_end_matches('/');
        if !base.is_empty() {
            return Ok(base.to_string());
        }
    }
    let Some(login) = login_url.map(str::trim).filter(|s| !s.is_empty()) else {
        return Err(DrugInfoError::config(format!(
            "{} or {} must be set",
            env::BASE_URL,
            env::LOGIN_URL
        )));
    };
    let Some((scheme, rest)) = login.split_once("://") else {
        return Err(DrugInfoError::config(format!(
            "{} has no scheme, cannot derive an origin from it",
            env::LOGIN_URL
        )));
    };
    let host = rest.split('/').next().unwrap_or("");
    if scheme.is_empty() || host.is_empty() {
        return Err(DrugInfoError::config(format!(
            "{} has no host, cannot derive an origin from it",
            env::LOGIN_URL
        )));
    }
    Ok(format!("{}://{}", scheme, host))
}
