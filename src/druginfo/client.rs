use crate::constants::api::PATH_PREFIX;
use crate::constants::limits::ERROR_BODY_LOG_BYTES;
use crate::constants::network::USER_AGENT;
use crate::druginfo::endpoints::Endpoint;
use crate::druginfo::params::{build_query, encode_body, path_identifier, resolve_timeout, EncodedBody};
use crate::druginfo::response::normalize_response;
use crate::errors::DrugInfoError;
use crate::services::logger::Logger;
use crate::services::settings::Settings;
use crate::utils::text::truncate_utf8_prefix;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Everything needed to send one request, computed before touching the
/// network so caller and configuration errors never cost a round trip.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<EncodedBody>,
    pub timeout: Duration,
    pub token: Option<String>,
}

#[derive(Clone)]
pub struct DrugInfoClient {
    logger: Logger,
    settings: Arc<Settings>,
    http: Client,
}

impl DrugInfoClient {
    pub fn new(logger: Logger, settings: Arc<Settings>) -> Result<Self, DrugInfoError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| DrugInfoError::config(format!("failed to build HTTP client: {}", err)))?;
        Ok(Self {
            logger: logger.child("client"),
            settings,
            http,
        })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn prepare(&self, endpoint: &Endpoint, args: &Value) -> Result<PreparedRequest, DrugInfoError> {
        let identifier = path_identifier(endpoint, args)?;
        let query = build_query(endpoint, args)?;
        let body = encode_body(endpoint, args)?;
        let timeout = resolve_timeout(endpoint, args)?;

        let config = self.settings.resolve()?;
        let url = build_url(&config.base_url, endpoint, identifier.as_deref(), &query)?;

        Ok(PreparedRequest {
            method: endpoint.method.as_reqwest(),
            url,
            body,
            timeout,
            token: config.token,
        })
    }

    /// Runs one endpoint call and returns the normalized mapping.
    pub async fn execute(&self, endpoint: &Endpoint, args: &Value) -> Result<Map<String, Value>, DrugInfoError> {
        let prepared = self.prepare(endpoint, args)?;
        self.send(endpoint, prepared).await
    }

    async fn send(&self, endpoint: &Endpoint, prepared: PreparedRequest) -> Result<Map<String, Value>, DrugInfoError> {
        let PreparedRequest {
            method,
            url,
            body,
            timeout,
            token,
        } = prepared;

        self.logger.debug(
            "request",
            Some(&serde_json::json!({
                "operation": endpoint.operation,
                "method": method.as_str(),
                "url": url.as_str(),
                "authorized": token.is_some(),
            })),
        );

        let mut req = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json")
            .timeout(timeout);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.header(CONTENT_TYPE, body.content_type).body(body.payload);
        }

        let started = Instant::now();
        let response = req.send().await.map_err(|err| self.transport_error(endpoint, err))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|err| self.transport_error(endpoint, err))?;

        let result = normalize_response(status, &text);
        if let Err(err) = &result {
            if !err.is_unauthorized() {
                self.logger.warn(
                    "upstream error",
                    Some(&serde_json::json!({
                        "operation": endpoint.operation,
                        "status": status,
                        "body": truncate_utf8_prefix(&text, ERROR_BODY_LOG_BYTES),
                    })),
                );
            }
        }
        self.logger.debug(
            "response",
            Some(&serde_json::json!({
                "operation": endpoint.operation,
                "status": status,
                "duration_ms": started.elapsed().as_millis() as u64,
            })),
        );
        result
    }

    fn transport_error(&self, endpoint: &Endpoint, err: reqwest::Error) -> DrugInfoError {
        let mapped = DrugInfoError::from(err);
        self.logger.warn(
            "transport error",
            Some(&serde_json::json!({
                "operation": endpoint.operation,
                "error": mapped.to_string(),
            })),
        );
        mapped
    }
}

/// `base` + `/v1/druginfo` + endpoint path, with the `{...}` segment replaced
/// by the (percent-encoded) identifier and `query` appended in order.
pub fn build_url(
    base: &str,
    endpoint: &Endpoint,
    identifier: Option<&str>,
    query: &[(String, String)],
) -> Result<Url, DrugInfoError> {
    let mut url = Url::parse(base)
        .map_err(|err| DrugInfoError::config(format!("invalid API origin '{}': {}", base, err)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DrugInfoError::config(format!(
            "API origin must use http or https, got '{}'",
            url.scheme()
        )));
    }
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| DrugInfoError::config(format!("API origin '{}' cannot be a base URL", base)))?;
        segments.pop_if_empty();
        for segment in PATH_PREFIX.split('/').chain(endpoint.path.split('/')) {
            if segment.is_empty() {
                continue;
            }
            if segment.starts_with('{') {
                let id = identifier.ok_or_else(|| {
                    DrugInfoError::invalid_argument(format!("{} is required", segment.trim_matches(|c| c == '{' || c == '}')))
                })?;
                segments.push(id);
            } else {
                segments.push(segment);
            }
        }
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.iter());
    }
    Ok(url)
}
