use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::constants::limits::SUGGESTION_LIMIT;
use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::utils::tool_errors::unknown_tool_error;

use serde_json::Value;

#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, args: Value) -> Result<Value, ToolError>;
}

#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, handlers: HashMap<String, Arc<dyn ToolHandler>>) -> Self {
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(handlers),
        }
    }

    pub fn has_tool(&self, tool: &str) -> bool {
        self.handlers.contains_key(tool)
    }

    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn execute(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        let Some(handler) = self.handlers.get(tool) else {
            return Err(unknown_tool_error(tool, &self.tool_names(), SUGGESTION_LIMIT));
        };

        let trace_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        self.logger.debug(
            "tool call",
            Some(&serde_json::json!({ "tool": tool, "trace_id": trace_id })),
        );

        let result = handler.handle(args).await;
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => self.logger.info(
                "tool ok",
                Some(&serde_json::json!({
                    "tool": tool,
                    "trace_id": trace_id,
                    "duration_ms": duration_ms,
                })),
            ),
            Err(err) => self.logger.warn(
                "tool failed",
                Some(&serde_json::json!({
                    "tool": tool,
                    "trace_id": trace_id,
                    "duration_ms": duration_ms,
                    "code": err.code,
                    "error": err.message,
                })),
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolErrorKind;

    struct Echo;

    #[async_trait]
    impl ToolHandler for Echo {
        async fn handle(&self, args: Value) -> Result<Value, ToolError> {
            Ok(args)
        }
    }

    fn executor() -> ToolExecutor {
        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        handlers.insert("druginfo_list_product".to_string(), Arc::new(Echo));
        handlers.insert("druginfo_get_product_by_code".to_string(), Arc::new(Echo));
        ToolExecutor::new(Logger::new("test"), handlers)
    }

    #[tokio::test]
    async fn dispatches_to_registered_handler() {
        let out = executor()
            .execute("druginfo_list_product", serde_json::json!({"q": "x"}))
            .await
            .expect("ok");
        assert_eq!(out, serde_json::json!({"q": "x"}));
    }

    #[tokio::test]
    async fn unknown_tool_suggests_close_names() {
        let err = executor()
            .execute("druginfo_list_prodcut", Value::Null)
            .await
            .expect_err("unknown");
        assert_eq!(err.kind, ToolErrorKind::InvalidParams);
        assert!(err.message.contains("druginfo_list_prodcut"));
        assert!(err
            .hint
            .as_deref()
            .unwrap_or_default()
            .contains("druginfo_list_product"));
    }

    #[test]
    fn tool_names_are_sorted() {
        assert_eq!(
            executor().tool_names(),
            vec!["druginfo_get_product_by_code", "druginfo_list_product"]
        );
    }
}
