use crate::druginfo::DrugInfoClient;
use crate::errors::ToolError;
use crate::managers::druginfo::DrugInfoManager;
use crate::mcp::catalog::tool_catalog;
use crate::services::logger::Logger;
use crate::services::login::LoginReauthenticator;
use crate::services::reauth::Reauthenticator;
use crate::services::settings::Settings;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub settings: Arc<Settings>,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    fn validate_tool_wiring(handlers: &HashMap<String, Arc<dyn ToolHandler>>) -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint("Every catalog tool must have a registered handler.")
            .with_details(serde_json::json!({ "missing_tools": missing })))
    }

    pub fn initialize() -> Result<Self, ToolError> {
        Self::build(Logger::new("druginfo"), Arc::new(Settings::from_env()), None)
    }

    /// Wires the client, re-login and tool handlers around `settings`. Pass a
    /// `reauth` to replace the default login flow.
    pub fn build(
        logger: Logger,
        settings: Arc<Settings>,
        reauth: Option<Arc<dyn Reauthenticator>>,
    ) -> Result<Self, ToolError> {
        let client = Arc::new(DrugInfoClient::new(logger.clone(), settings.clone())?);
        let reauth: Arc<dyn Reauthenticator> = match reauth {
            Some(reauth) => reauth,
            None => Arc::new(LoginReauthenticator::new(
                logger.clone(),
                settings.clone(),
                client.http().clone(),
            )),
        };

        let manager = Arc::new(DrugInfoManager::new(logger.clone(), client, reauth));
        let handlers = manager.handlers();
        Self::validate_tool_wiring(&handlers)?;

        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));
        logger.debug(
            "initialized",
            Some(&serde_json::json!({ "tools": tool_executor.tool_names().len() })),
        );

        Ok(Self {
            logger,
            settings,
            tool_executor,
        })
    }
}
