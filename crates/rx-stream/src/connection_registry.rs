use crate::{
    ConnectionId, ConnectionLimits, Metrics, Result as StreamErrorResult, StreamConfig,
    StreamError,
};

use rx_core::Event;

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Registry for tracking active monitor stream connections.
///
/// Process-wide shared state, constructor-injected (created once at server
/// start, cloned into handlers). The lock makes registry access safe from
/// concurrent scan tasks, broadcasts and subscription handlers.
pub struct ConnectionRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    limits: ConnectionLimits,
    config: StreamConfig,
    metrics: Metrics,
}

struct RegistryInner {
    /// All active connections by composite connection id
    connections: HashMap<ConnectionId, ConnectionHandle>,
}

/// Per-connection sink plus its delivery-failure state
struct ConnectionHandle {
    sender: mpsc::Sender<Event>,
    failed_sends: u32,
}

impl ConnectionRegistry {
    pub fn new(limits: ConnectionLimits, config: StreamConfig, metrics: Metrics) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                connections: HashMap::new(),
            })),
            limits,
            config,
            metrics,
        }
    }

    /// Register a new connection for a tenant. Each call yields a unique
    /// connection id, never reused.
    pub async fn register(
        &self,
        tenant_id: Uuid,
        sender: mpsc::Sender<Event>,
    ) -> StreamErrorResult<ConnectionId> {
        let mut inner = self.inner.write().await;

        if inner.connections.len() >= self.limits.max_total {
            warn!(
                "Total connection limit reached: {}/{}",
                inner.connections.len(),
                self.limits.max_total
            );
            return Err(StreamError::ConnectionLimitExceeded {
                current: inner.connections.len(),
                max: self.limits.max_total,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let connection_id = ConnectionId::new(tenant_id);
        inner.connections.insert(
            connection_id.clone(),
            ConnectionHandle {
                sender,
                failed_sends: 0,
            },
        );

        info!(
            "Registered connection {connection_id} ({} total)",
            inner.connections.len()
        );
        self.metrics.connection_established();

        Ok(connection_id)
    }

    /// Unregister a connection. Idempotent.
    pub async fn unregister(&self, connection_id: &ConnectionId) {
        let mut inner = self.inner.write().await;

        if inner.connections.remove(connection_id).is_some() {
            info!(
                "Unregistered connection {connection_id} ({} total remaining)",
                inner.connections.len()
            );
            self.metrics.connection_closed();
        }
    }

    /// Deliver one event to one connection.
    ///
    /// A closed sink removes the connection and reports `ConnectionClosed`.
    /// A full sink drops the event; `max_send_failures` consecutive fulls
    /// close the connection (`SendBufferFull`) - the liveness bound for
    /// clients that vanish without signalling abort.
    pub async fn send(
        &self,
        connection_id: &ConnectionId,
        event: Event,
    ) -> StreamErrorResult<()> {
        let kind = event.kind();
        let mut inner = self.inner.write().await;

        let Some(handle) = inner.connections.get_mut(connection_id) else {
            return Err(StreamError::ConnectionClosed {
                connection_id: connection_id.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        match handle.sender.try_send(event) {
            Ok(()) => {
                handle.failed_sends = 0;
                self.metrics.event_sent(kind);
                Ok(())
            }
            Err(TrySendError::Closed(_)) => {
                inner.connections.remove(connection_id);
                info!("Connection {connection_id} closed by client, removed from registry");
                self.metrics.connection_closed();
                Err(StreamError::ConnectionClosed {
                    connection_id: connection_id.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            Err(TrySendError::Full(_)) => {
                handle.failed_sends += 1;
                if handle.failed_sends >= self.config.max_send_failures {
                    inner.connections.remove(connection_id);
                    warn!(
                        "Connection {connection_id} failed {} consecutive sends, closing",
                        self.config.max_send_failures
                    );
                    self.metrics.connection_closed();
                    Err(StreamError::SendBufferFull {
                        connection_id: connection_id.to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    })
                } else {
                    debug!("Send buffer full for connection {connection_id}, dropped {kind}");
                    self.metrics.event_dropped(kind);
                    Ok(())
                }
            }
        }
    }

    /// Broadcast an event to every connection whose key is prefixed by the
    /// tenant id. Per-connection failures are isolated: a dead sink is
    /// deregistered without aborting delivery to the rest. Returns the
    /// number of connections the event was delivered to.
    pub async fn broadcast(&self, tenant_id: Uuid, event: Event) -> usize {
        let kind = event.kind();
        let mut inner = self.inner.write().await;

        let mut delivered = 0;
        let mut dead: Vec<ConnectionId> = Vec::new();

        for (connection_id, handle) in inner
            .connections
            .iter_mut()
            .filter(|(connection_id, _)| connection_id.belongs_to(tenant_id))
        {
            match handle.sender.try_send(event.clone()) {
                Ok(()) => {
                    handle.failed_sends = 0;
                    delivered += 1;
                }
                Err(TrySendError::Closed(_)) => {
                    warn!("Broadcast to connection {connection_id} failed: closed");
                    dead.push(connection_id.clone());
                }
                Err(TrySendError::Full(_)) => {
                    handle.failed_sends += 1;
                    if handle.failed_sends >= self.config.max_send_failures {
                        warn!(
                            "Connection {connection_id} failed {} consecutive sends, closing",
                            self.config.max_send_failures
                        );
                        dead.push(connection_id.clone());
                    } else {
                        debug!("Send buffer full for connection {connection_id}, dropped {kind}");
                        self.metrics.event_dropped(kind);
                    }
                }
            }
        }

        for connection_id in &dead {
            inner.connections.remove(connection_id);
            info!("Unregistered connection {connection_id} after broadcast failure");
            self.metrics.connection_closed();
        }

        debug!("Broadcast {kind} to tenant {tenant_id} ({delivered} receivers)");
        self.metrics.broadcast_published(kind, delivered);

        delivered
    }

    /// Total connection count, process-wide across all tenants
    pub async fn total_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.connections.len()
    }

    /// Connection count for one tenant
    pub async fn tenant_count(&self, tenant_id: Uuid) -> usize {
        let inner = self.inner.read().await;
        inner
            .connections
            .keys()
            .filter(|connection_id| connection_id.belongs_to(tenant_id))
            .count()
    }

    /// Check whether a connection is still registered
    pub async fn contains(&self, connection_id: &ConnectionId) -> bool {
        let inner = self.inner.read().await;
        inner.connections.contains_key(connection_id)
    }
}

impl Clone for ConnectionRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            limits: self.limits.clone(),
            config: self.config.clone(),
            metrics: self.metrics.clone(),
        }
    }
}
