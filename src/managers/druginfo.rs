use crate::druginfo::params::resolve_timeout;
use crate::druginfo::{endpoints, DrugInfoClient, Endpoint};
use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::services::reauth::{call_with_reauth, Reauthenticator};
use crate::services::tool_executor::ToolHandler;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Runs endpoint calls through the client with the single re-login retry.
pub struct DrugInfoManager {
    logger: Logger,
    client: Arc<DrugInfoClient>,
    reauth: Arc<dyn Reauthenticator>,
}

impl DrugInfoManager {
    pub fn new(logger: Logger, client: Arc<DrugInfoClient>, reauth: Arc<dyn Reauthenticator>) -> Self {
        Self {
            logger: logger.child("druginfo"),
            client,
            reauth,
        }
    }

    pub async fn call(&self, endpoint: &Endpoint, args: &Value) -> Result<Map<String, Value>, ToolError> {
        // A bad timeout fails the first attempt before anything is sent, so the
        // fallback only matters for the re-login request.
        let timeout = resolve_timeout(endpoint, args)
            .unwrap_or_else(|_| Duration::from_secs(endpoint.default_timeout_s));
        let client = self.client.as_ref();

        let outcome = call_with_reauth(self.reauth.as_ref(), timeout, &self.logger, move || {
            client.execute(endpoint, args)
        })
        .await;

        if outcome.reauthenticated {
            self.logger.info(
                "retried after re-authentication",
                Some(&serde_json::json!({
                    "operation": endpoint.operation,
                    "attempts": outcome.attempts,
                    "ok": outcome.result.is_ok(),
                })),
            );
        }
        outcome.result.map_err(ToolError::from)
    }

    /// One handler per endpoint, keyed by tool name.
    pub fn handlers(self: &Arc<Self>) -> HashMap<String, Arc<dyn ToolHandler>> {
        endpoints()
            .iter()
            .map(|endpoint| {
                let tool: Arc<dyn ToolHandler> = Arc::new(EndpointTool {
                    manager: self.clone(),
                    endpoint,
                });
                (endpoint.tool_name(), tool)
            })
            .collect()
    }
}

pub struct EndpointTool {
    manager: Arc<DrugInfoManager>,
    endpoint: &'static Endpoint,
}

#[async_trait::async_trait]
impl ToolHandler for EndpointTool {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.manager
            .call(self.endpoint, &args)
            .await
            .map(Value::Object)
    }
}
