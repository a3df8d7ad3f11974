#![allow(dead_code)]

use async_trait::async_trait;
use druginfo_mcp::app::App;
use druginfo_mcp::errors::DrugInfoError;
use druginfo_mcp::services::logger::Logger;
use druginfo_mcp::services::reauth::Reauthenticator;
use druginfo_mcp::services::settings::{MapSource, Settings};
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use wiremock::{MockServer, Request};

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub fn restore_env(key: &str, previous: Option<String>) {
    match previous {
        Some(value) => std::env::set_var(key, value),
        None => std::env::remove_var(key),
    }
}

/// Requests the mock server has seen, in arrival order.
pub async fn received(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
}

/// Path plus query string, exactly as sent.
pub fn target(request: &Request) -> String {
    match request.url.query() {
        Some(query) => format!("{}?{}", request.url.path(), query),
        None => request.url.path().to_string(),
    }
}

pub fn body_text(request: &Request) -> String {
    String::from_utf8_lossy(&request.body).to_string()
}

pub fn settings_with(pairs: &[(&str, &str)]) -> Arc<Settings> {
    let source = pairs
        .iter()
        .fold(MapSource::new(), |source, (key, value)| source.with(key, *value));
    Arc::new(Settings::new(Arc::new(source)))
}

pub fn settings_for(base_url: &str) -> Arc<Settings> {
    settings_with(&[("EDB_BASE_URL", base_url), ("EDB_TOKEN", "test-token")])
}

#[derive(Default)]
pub struct CountingReauth {
    calls: AtomicUsize,
}

impl CountingReauth {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Reauthenticator for CountingReauth {
    async fn reauthenticate(&self, _timeout: Duration) -> Result<(), DrugInfoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn app_with(settings: Arc<Settings>, reauth: Option<Arc<dyn Reauthenticator>>) -> App {
    App::build(Logger::new("test"), settings, reauth).expect("app")
}
