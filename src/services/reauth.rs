use crate::errors::DrugInfoError;
use crate::services::logger::Logger;
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// Refreshes whatever credential the client sends. Called at most once per
/// tool call, after a 401; its failure never fails the call by itself.
#[async_trait]
pub trait Reauthenticator: Send + Sync {
    async fn reauthenticate(&self, timeout: Duration) -> Result<(), DrugInfoError>;
}

/// Result of one guarded call plus how it got there.
#[derive(Debug)]
pub struct ReauthOutcome<T> {
    pub result: Result<T, DrugInfoError>,
    pub attempts: u8,
    pub reauthenticated: bool,
}

/// Runs `op`; on `Unauthorized` re-authenticates once and runs `op` exactly
/// once more. Whatever the second attempt returns is final.
pub async fn call_with_reauth<T, F, Fut>(
    reauth: &dyn Reauthenticator,
    timeout: Duration,
    logger: &Logger,
    mut op: F,
) -> ReauthOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DrugInfoError>>,
{
    match op().await {
        Err(DrugInfoError::Unauthorized) => {}
        result => {
            return ReauthOutcome {
                result,
                attempts: 1,
                reauthenticated: false,
            }
        }
    }

    logger.info("unauthorized, re-authenticating before retry", None);
    if let Err(err) = reauth.reauthenticate(timeout).await {
        logger.warn(
            "re-authentication failed, retrying anyway",
            Some(&Value::String(err.to_string())),
        );
    }

    ReauthOutcome {
        result: op().await,
        attempts: 2,
        reauthenticated: true,
    }
}
