use crate::constants::env;
use crate::druginfo::response::normalize_response;
use crate::errors::DrugInfoError;
use crate::services::logger::Logger;
use crate::services::reauth::Reauthenticator;
use crate::services::settings::Settings;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

const TOKEN_KEYS: [&str; 3] = ["token", "accessToken", "access_token"];

/// Logs in with `EDB_USERNAME`/`EDB_PASSWORD` against `EDB_LOGIN_URL` and
/// stores the returned token as the session token.
pub struct LoginReauthenticator {
    logger: Logger,
    settings: Arc<Settings>,
    http: Client,
}

impl LoginReauthenticator {
    pub fn new(logger: Logger, settings: Arc<Settings>, http: Client) -> Self {
        Self {
            logger: logger.child("auth"),
            settings,
            http,
        }
    }
}

#[async_trait]
impl Reauthenticator for LoginReauthenticator {
    async fn reauthenticate(&self, timeout: Duration) -> Result<(), DrugInfoError> {
        let login_url = self.settings.login_url().ok_or_else(|| {
            DrugInfoError::config(format!("{} is not set, cannot re-login", env::LOGIN_URL))
        })?;
        let credentials = self.settings.credentials().ok_or_else(|| {
            DrugInfoError::config(format!(
                "{} and {} are required to re-login",
                env::USERNAME,
                env::PASSWORD
            ))
        })?;

        let response = self
            .http
            .post(&login_url)
            .header(ACCEPT, "application/json")
            .timeout(timeout)
            .json(&serde_json::json!({
                "username": credentials.username,
                "password": credentials.password,
            }))
            .send()
            .await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = normalize_response(status, &text)?;

        let token = extract_token(&body).ok_or_else(|| DrugInfoError::Http {
            status,
            body: serde_json::json!({"text": "login response did not contain a token"}),
        })?;
        self.settings.set_session_token(&token);
        self.logger.info(
            "session token refreshed",
            Some(&serde_json::json!({ "status": status })),
        );
        Ok(())
    }
}

/// Finds the token in a login response, either top-level or under `data`.
pub fn extract_token(body: &Map<String, Value>) -> Option<String> {
    let direct = TOKEN_KEYS
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str));
    let nested = || {
        let data = body.get("data")?.as_object()?;
        TOKEN_KEYS
            .iter()
            .find_map(|key| data.get(*key).and_then(Value::as_str))
    };
    let raw = direct.or_else(nested)?.trim();
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
