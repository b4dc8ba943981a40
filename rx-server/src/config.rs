use crate::error::{Result as ServerErrorResult, ServerError};

use std::net::SocketAddr;
use std::path::PathBuf;

use log::LevelFilter;

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    pub bind_addr: SocketAddr,

    /// SQLite database path (default: rx-live.db)
    pub database_path: PathBuf,

    /// Alert scan interval in seconds (default: 10)
    pub scan_interval_secs: u64,

    /// Expiry alert window in days, inclusive (default: 30)
    pub expiry_window_days: i64,

    /// Per-connection send buffer size (default: 32)
    pub send_buffer_size: usize,

    /// Consecutive full-buffer sends before a connection is closed (default: 3)
    pub max_send_failures: u32,

    /// Maximum total connections (default: 10000)
    pub max_connections: usize,

    /// Log level (default: info)
    pub log_level: LevelFilter,

    /// Optional log file; stdout when unset
    pub log_file: Option<PathBuf>,

    /// Enable colored logs (default: true)
    pub log_colored: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> ServerErrorResult<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .map_err(|source| ServerError::InvalidBindAddr { source })?;

        let config = Self {
            bind_addr,

            database_path: std::env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("rx-live.db")),

            scan_interval_secs: std::env::var("SCAN_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),

            expiry_window_days: std::env::var("EXPIRY_WINDOW_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),

            send_buffer_size: std::env::var("SEND_BUFFER_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(32),

            max_send_failures: std::env::var("MAX_SEND_FAILURES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),

            max_connections: std::env::var("MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10_000),

            log_level: std::env::var("LOG_LEVEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(LevelFilter::Info),

            log_file: std::env::var("LOG_FILE").ok().map(PathBuf::from),

            log_colored: std::env::var("LOG_COLORED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ServerErrorResult<()> {
        if self.scan_interval_secs == 0 {
            return Err(ServerError::InvalidConfig {
                message: "SCAN_INTERVAL_SECS must be at least 1".to_string(),
            });
        }

        if self.expiry_window_days < 0 {
            return Err(ServerError::InvalidConfig {
                message: "EXPIRY_WINDOW_DAYS must not be negative".to_string(),
            });
        }

        if self.send_buffer_size == 0 {
            return Err(ServerError::InvalidConfig {
                message: "SEND_BUFFER_SIZE must be at least 1".to_string(),
            });
        }

        if self.max_send_failures == 0 {
            return Err(ServerError::InvalidConfig {
                message: "MAX_SEND_FAILURES must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    pub fn log_summary(&self) {
        log::info!("Config: bind_addr={}", self.bind_addr);
        log::info!("Config: database_path={}", self.database_path.display());
        log::info!(
            "Config: scan_interval={}s, expiry_window={}d",
            self.scan_interval_secs,
            self.expiry_window_days
        );
        log::info!(
            "Config: send_buffer={}, max_send_failures={}, max_connections={}",
            self.send_buffer_size,
            self.max_send_failures,
            self.max_connections
        );
    }
}
