use crate::{
    AlertScanner, ConnectionRegistry, EventStream, Metrics, Result as StreamErrorResult,
    ShutdownCoordinator, StreamConfig, StreamError, create_stream_span,
    event_stream::ConnectionGuard,
};

use rx_core::Event;
use rx_db::TenantRepository;

use std::panic::Location;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Sse},
};
use error_location::ErrorLocation;
use log::info;
use sqlx::SqlitePool;
use tokio::sync::mpsc;
use tracing::Instrument;

/// Shared application state for stream and API handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub registry: ConnectionRegistry,
    pub scanner: AlertScanner,
    pub config: StreamConfig,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
}

/// Monitor stream handler: `GET /api/v1/{subdomain}/monitor`
///
/// Resolves the tenant, registers a connection, emits
/// `connection_established`, starts the connection's scan task and hands
/// the sink back as an SSE response. An unknown or deactivated subdomain
/// yields a 404 JSON body before any stream is established.
pub async fn monitor_handler(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> StreamErrorResult<impl IntoResponse> {
    let tenant = TenantRepository::new(state.pool.clone())
        .find_by_subdomain(&subdomain)
        .await?
        .ok_or_else(|| StreamError::TenantNotFound {
            subdomain: subdomain.clone(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let span = create_stream_span(&subdomain, &tenant.id.to_string());

    async move {
        let (tx, rx) = mpsc::channel(state.config.send_buffer_size);
        let connection_id = state.registry.register(tenant.id, tx).await?;

        let scan_task = state.scanner.spawn(connection_id.clone());
        let guard = ConnectionGuard::new(state.registry.clone(), connection_id.clone(), scan_task);

        // First event on the wire, before the first scan tick
        state
            .registry
            .send(
                &connection_id,
                Event::connection_established(tenant.id, connection_id.to_string()),
            )
            .await?;

        info!("Monitor stream opened: connection {connection_id} (tenant {subdomain})");

        Ok((
            [(header::CACHE_CONTROL, "no-cache")],
            Sse::new(EventStream::new(rx, guard)),
        ))
    }
    .instrument(span)
    .await
}
