#![allow(dead_code)]

use rx_core::{Medicine, Tenant};
use rx_db::TenantRepository;
use rx_server::build_router;
use rx_stream::{
    AlertScanner, AppState, ConnectionLimits, ConnectionRegistry, Metrics, ScanConfig,
    ShutdownCoordinator, StreamConfig,
};

use std::net::SocketAddr;
use std::time::Duration;

use axum_test::TestServer;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

/// Creates an in-memory SQLite pool with migrations run
pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .expect("Failed to enable foreign keys");

    sqlx::migrate!("../crates/rx-db/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Test state with default stream settings and a fast scan interval
pub async fn create_test_state() -> AppState {
    create_test_state_with_scan_interval(Duration::from_millis(100)).await
}

pub async fn create_test_state_with_scan_interval(scan_interval: Duration) -> AppState {
    let pool = create_test_pool().await;
    let metrics = Metrics::new();
    let config = StreamConfig::default();
    let registry = ConnectionRegistry::new(
        ConnectionLimits::default(),
        config.clone(),
        metrics.clone(),
    );
    let scanner = AlertScanner::new(
        pool.clone(),
        registry.clone(),
        ScanConfig {
            scan_interval,
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

/// In-process test server (REST endpoints)
pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state, None)).expect("Failed to create test server")
}

/// Real TCP server for streaming tests
pub async fn spawn_test_server(state: AppState) -> SocketAddr {
    let app = build_router(state, None);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    addr
}

/// Inserts an active tenant and returns it
pub async fn create_test_tenant(pool: &SqlitePool, subdomain: &str) -> Tenant {
    let tenant =
        Tenant::new(subdomain, format!("{subdomain} Pharmacy")).expect("valid test subdomain");

    TenantRepository::new(pool.clone())
        .create(&tenant)
        .await
        .expect("Failed to create test tenant");

    tenant
}

/// A medicine expiring comfortably far in the future with healthy stock
pub fn create_test_medicine(tenant_id: Uuid, name: &str) -> Medicine {
    Medicine::new(
        tenant_id,
        name,
        100,
        10,
        Utc::now() + chrono::Duration::days(365),
    )
}
