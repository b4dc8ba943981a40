//! Reconnecting consumer for a tenant's monitor stream.
//!
//! One client maintains at most one live stream. On transport failure it
//! reconnects with bounded exponential backoff; once the attempt ceiling is
//! reached it stops silently and waits for an explicit `connect()`.

use crate::{MonitorError, MonitorState, ReconnectPolicy, Result as MonitorErrorResult, SseParser};

use rx_core::Event;

use std::sync::Arc;

use futures::StreamExt;
use log::{debug, info, warn};
use reqwest::Client as ReqwestClient;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Invoked for every well-formed inbound event, before it is folded into
/// the shared state.
pub type EventCallback = Arc<dyn Fn(&Event) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Server URL, e.g. "http://127.0.0.1:8080"
    pub server_url: String,
    /// Tenant routing key
    pub subdomain: String,
    pub reconnect: ReconnectPolicy,
}

impl MonitorConfig {
    pub fn new(server_url: &str, subdomain: &str) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            subdomain: subdomain.to_string(),
            reconnect: ReconnectPolicy::default(),
        }
    }

    fn monitor_url(&self) -> String {
        format!("{}/api/v1/{}/monitor", self.server_url, self.subdomain)
    }
}

pub struct MonitorClient {
    config: MonitorConfig,
    http: ReqwestClient,
    state: Arc<RwLock<MonitorState>>,
    callback: Option<EventCallback>,
    task: Option<JoinHandle<()>>,
}

impl MonitorClient {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            http: ReqwestClient::new(),
            state: Arc::new(RwLock::new(MonitorState::default())),
            callback: None,
            task: None,
        }
    }

    /// Register an event callback (builder style)
    pub fn with_callback(mut self, callback: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Open the stream. Any live stream or pending reconnect for this
    /// client is superseded first - at most one stream per client.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect(&mut self) {
        self.abort_stream();

        let config = self.config.clone();
        let http = self.http.clone();
        let state = Arc::clone(&self.state);
        let callback = self.callback.clone();

        self.task = Some(tokio::spawn(run(config, http, state, callback)));
    }

    /// Close the stream and cancel any pending reconnect. Idempotent.
    pub async fn disconnect(&mut self) {
        self.abort_stream();
        self.state.write().await.mark_disconnected();
    }

    /// Copy of the current folded state
    pub async fn snapshot(&self) -> MonitorState {
        self.state.read().await.clone()
    }

    pub async fn clear_stock_alerts(&self) {
        self.state.write().await.clear_stock_alerts();
    }

    pub async fn clear_expiry_alerts(&self) {
        self.state.write().await.clear_expiry_alerts();
    }

    pub async fn clear_history(&self) {
        self.state.write().await.clear_history();
    }

    fn abort_stream(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for MonitorClient {
    fn drop(&mut self) {
        self.abort_stream();
    }
}

async fn run(
    config: MonitorConfig,
    http: ReqwestClient,
    state: Arc<RwLock<MonitorState>>,
    callback: Option<EventCallback>,
) {
    loop {
        match stream_once(&config, &http, &state, callback.as_ref()).await {
            Ok(()) => info!("Monitor stream ended for tenant {}", config.subdomain),
            Err(e) => warn!("Monitor stream error for tenant {}: {e}", config.subdomain),
        }

        let attempts = {
            let mut guard = state.write().await;
            guard.mark_disconnected();
            guard.reconnect_attempts
        };

        let Some(delay) = config.reconnect.delay_for(attempts) else {
            warn!(
                "Reconnect ceiling reached for tenant {}, giving up",
                config.subdomain
            );
            break;
        };

        info!(
            "Reconnecting to tenant {} in {delay:?} (attempt {})",
            config.subdomain,
            attempts + 1
        );
        state.write().await.reconnect_attempts = attempts + 1;
        tokio::time::sleep(delay).await;
    }
}

/// Consume one stream until the transport ends. Malformed payloads are
/// logged and dropped, never fatal to the stream.
async fn stream_once(
    config: &MonitorConfig,
    http: &ReqwestClient,
    state: &Arc<RwLock<MonitorState>>,
    callback: Option<&EventCallback>,
) -> MonitorErrorResult<()> {
    let response = http.get(config.monitor_url()).send().await?;
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(MonitorError::rejected(status.as_u16(), message));
    }

    let mut parser = SseParser::new();
    let mut body = response.bytes_stream();

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;

        for payload in parser.feed(&chunk) {
            match serde_json::from_str::<Event>(&payload) {
                Ok(event) => {
                    if let Some(callback) = callback {
                        callback(&event);
                    }
                    state.write().await.apply(event);
                }
                Err(e) => {
                    warn!("Dropping malformed event: {e}");
                    debug!("Malformed payload: {payload}");
                }
            }
        }
    }

    Ok(())
}
