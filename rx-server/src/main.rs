pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;

pub use api::{
    delete_response::DeleteResponse,
    error::ApiError,
    error::Result as ApiResult,
    medicines::{
        create_medicine_request::CreateMedicineRequest,
        medicine_dto::MedicineDto,
        medicine_list_response::MedicineListResponse,
        medicine_response::MedicineResponse,
        update_medicine_request::UpdateMedicineRequest,
    },
};

pub use crate::routes::build_router;

use rx_stream::{
    AlertScanner, AppState, ConnectionLimits, ConnectionRegistry, Metrics, ScanConfig,
    ShutdownCoordinator, StreamConfig,
};

use std::error::Error;
use std::time::Duration;

use log::{error, info};
use metrics_exporter_prometheus::PrometheusBuilder;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = config::Config::from_env()?;

    // Initialize logger (before any other logging)
    logger::initialize(config.log_level, config.log_file.clone(), config.log_colored)?;

    info!("Starting rx-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Initialize database pool
    info!("Connecting to database: {}", config.database_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(&config.database_path)
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .busy_timeout(Duration::from_secs(5)),
        )
        .await?;

    info!("Database connection established");

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../crates/rx-db/migrations").run(&pool).await?;
    info!("Migrations complete");

    // Install Prometheus recorder for the metrics facade
    let prometheus = PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus recorder installed");

    // Create metrics collector
    let metrics = Metrics::new();

    // Create connection registry with limits
    let stream_config = StreamConfig {
        send_buffer_size: config.send_buffer_size,
        max_send_failures: config.max_send_failures,
    };
    let registry = ConnectionRegistry::new(
        ConnectionLimits {
            max_total: config.max_connections,
        },
        stream_config.clone(),
        metrics.clone(),
    );

    // Create the per-connection alert scanner
    let scanner = AlertScanner::new(
        pool.clone(),
        registry.clone(),
        ScanConfig {
            scan_interval: Duration::from_secs(config.scan_interval_secs),
            expiry_window_days: config.expiry_window_days,
        },
        metrics.clone(),
    );

    // Create shutdown coordinator
    let shutdown = ShutdownCoordinator::new();

    // Build application state
    let app_state = AppState {
        pool,
        registry,
        scanner,
        config: stream_config,
        metrics,
        shutdown: shutdown.clone(),
    };

    // Build router
    let app = build_router(app_state, Some(prometheus));

    // Create TCP listener
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    // Start server with graceful shutdown
    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.subscribe_guard().wait().await;
            info!("Graceful shutdown complete");
        })
        .await?;

    Ok(())
}
