use super::test_db::create_test_pool;

use rx_stream::{
    AlertScanner, AppState, ConnectionLimits, ConnectionRegistry, Metrics, ScanConfig,
    ShutdownCoordinator, StreamConfig,
};

use std::time::Duration;

use axum::{Router, routing::get};

/// Test state with a fast scan interval and small buffers
pub async fn create_test_state() -> AppState {
    create_test_state_with(ConnectionLimits::default(), StreamConfig::default()).await
}

pub async fn create_test_state_with(
    limits: ConnectionLimits,
    config: StreamConfig,
) -> AppState {
    let pool = create_test_pool().await;
    let metrics = Metrics::new();
    let registry = ConnectionRegistry::new(limits, config.clone(), metrics.clone());
    let scanner = AlertScanner::new(
        pool.clone(),
        registry.clone(),
        ScanConfig {
            scan_interval: Duration::from_millis(50),
            expiry_window_days: 30,
        },
        metrics.clone(),
    );

    AppState {
        pool,
        registry,
        scanner,
        config,
        metrics,
        shutdown: ShutdownCoordinator::new(),
    }
}

/// Router with just the monitor stream endpoint
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/{subdomain}/monitor", get(rx_stream::monitor_handler))
        .with_state(state)
}
