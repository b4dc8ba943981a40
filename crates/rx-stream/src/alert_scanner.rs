//! Periodic alert evaluation.
//!
//! Every connection owns one scan task on a fixed interval. A tick queries
//! the tenant's inventory and pushes, in fixed order: a stock alert (when
//! any item sits at or below its minimum), an expiry alert (when any item
//! expires inside the window), and always a heartbeat. Alert payloads are
//! the complete current set, so a client is consistent after any single
//! tick. A storage failure aborts the connection: task exits, registry
//! entry removed, sink closed. No retry.

use crate::{ConnectionId, ConnectionRegistry, Metrics, Result as StreamErrorResult, ScanConfig, StreamError};

use rx_core::{Event, ExpiryAlertItem, StockAlertItem};
use rx_db::MedicineRepository;

use chrono::Utc;
use log::{error, info};
use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

#[derive(Clone)]
pub struct AlertScanner {
    pool: SqlitePool,
    registry: ConnectionRegistry,
    config: ScanConfig,
    metrics: Metrics,
}

impl AlertScanner {
    pub fn new(
        pool: SqlitePool,
        registry: ConnectionRegistry,
        config: ScanConfig,
        metrics: Metrics,
    ) -> Self {
        Self {
            pool,
            registry,
            config,
            metrics,
        }
    }

    /// Spawn the scan task for one connection. The first tick fires one
    /// full interval after open; `connection_established` is the only
    /// immediate event on a new stream.
    pub fn spawn(&self, connection_id: ConnectionId) -> JoinHandle<()> {
        let scanner = self.clone();
        tokio::spawn(async move { scanner.run(connection_id).await })
    }

    async fn run(self, connection_id: ConnectionId) {
        let period = self.config.scan_interval;
        let mut interval = interval_at(Instant::now() + period, period);

        loop {
            interval.tick().await;

            match self.scan(&connection_id).await {
                Ok(()) => {}
                Err(
                    StreamError::ConnectionClosed { .. } | StreamError::SendBufferFull { .. },
                ) => {
                    // Registry already dropped the entry
                    info!("Scan loop for connection {connection_id} stopped: sink closed");
                    break;
                }
                Err(e) => {
                    error!("Scan failed for connection {connection_id}: {e}");
                    self.metrics.scan_error();
                    self.registry.unregister(&connection_id).await;
                    break;
                }
            }
        }
    }

    /// Run one scan pass for a connection: stock alert, expiry alert,
    /// heartbeat, in that order.
    pub async fn scan(&self, connection_id: &ConnectionId) -> StreamErrorResult<()> {
        let tenant_id = connection_id.tenant_id();
        let repo = MedicineRepository::new(self.pool.clone());
        let now = Utc::now();

        let low = repo.below_minimum(tenant_id).await?;
        if !low.is_empty() {
            let medicines = low
                .iter()
                .map(|m| StockAlertItem {
                    id: m.id,
                    name: m.name.clone(),
                    stock: m.stock,
                    min_stock: m.min_stock,
                    urgency: None,
                })
                .collect();
            self.registry
                .send(connection_id, Event::stock_alert(tenant_id, medicines))
                .await?;
        }

        let expiring = repo
            .expiring_within(tenant_id, self.config.expiry_window_days, now)
            .await?;
        if !expiring.is_empty() {
            let medicines = expiring
                .iter()
                .map(|m| ExpiryAlertItem {
                    id: m.id,
                    name: m.name.clone(),
                    expiry_date: m.expiry_date,
                    days_until_expiry: m.days_until_expiry(now),
                    urgency: None,
                })
                .collect();
            self.registry
                .send(connection_id, Event::expiry_alert(tenant_id, medicines))
                .await?;
        }

        let medicine_count = repo.count_active(tenant_id).await?;
        let active_connections = self.registry.total_count().await as u64;
        self.registry
            .send(
                connection_id,
                Event::heartbeat(tenant_id, active_connections, medicine_count),
            )
            .await?;

        Ok(())
    }
}
