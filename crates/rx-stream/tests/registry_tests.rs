mod common;

use common::create_test_state;

use rx_core::{Event, EventKind};
use rx_stream::{ConnectionLimits, ConnectionRegistry, Metrics, StreamConfig, StreamError};

use tokio::sync::mpsc;
use uuid::Uuid;

fn create_registry(limits: ConnectionLimits, config: StreamConfig) -> ConnectionRegistry {
    ConnectionRegistry::new(limits, config, Metrics::new())
}

#[tokio::test]
async fn given_registered_connection_when_send_then_event_received() {
    // Given - A registered connection
    let registry = create_registry(ConnectionLimits::default(), StreamConfig::default());
    let tenant_id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::channel(8);
    let connection_id = registry.register(tenant_id, tx).await.unwrap();

    // When - Sending a heartbeat
    registry
        .send(&connection_id, Event::heartbeat(tenant_id, 1, 0))
        .await
        .unwrap();

    // Then - The sink receives it
    let event = rx.recv().await.expect("Should receive event");
    assert_eq!(event.kind(), EventKind::Heartbeat);
    assert_eq!(event.tenant_id, tenant_id);
}

#[tokio::test]
async fn given_two_registrations_then_connection_ids_are_unique_and_tenant_prefixed() {
    let registry = create_registry(ConnectionLimits::default(), StreamConfig::default());
    let tenant_id = Uuid::new_v4();

    let (tx1, _rx1) = mpsc::channel(8);
    let (tx2, _rx2) = mpsc::channel(8);
    let id1 = registry.register(tenant_id, tx1).await.unwrap();
    let id2 = registry.register(tenant_id, tx2).await.unwrap();

    assert_ne!(id1, id2, "Each call yields a fresh connection id");
    assert!(id1.to_string().starts_with(&tenant_id.to_string()));
    assert!(id1.belongs_to(tenant_id));
    assert!(!id1.belongs_to(Uuid::new_v4()));
    assert_eq!(registry.total_count().await, 2);
    assert_eq!(registry.tenant_count(tenant_id).await, 2);
}

#[tokio::test]
async fn given_connection_limit_reached_when_register_then_rejected() {
    // Given - A registry capped at one connection
    let registry = create_registry(
        ConnectionLimits { max_total: 1 },
        StreamConfig::default(),
    );
    let tenant_id = Uuid::new_v4();

    let (tx1, _rx1) = mpsc::channel(8);
    registry.register(tenant_id, tx1).await.unwrap();

    // When - Registering a second connection
    let (tx2, _rx2) = mpsc::channel(8);
    let result = registry.register(tenant_id, tx2).await;

    // Then - Rejected without registering
    assert!(matches!(
        result,
        Err(StreamError::ConnectionLimitExceeded { current: 1, max: 1, .. })
    ));
    assert_eq!(registry.total_count().await, 1);
}

#[tokio::test]
async fn given_two_clients_same_tenant_when_broadcast_then_both_receive() {
    // Given - Two connections for the same tenant
    let registry = create_registry(ConnectionLimits::default(), StreamConfig::default());
    let tenant_id = Uuid::new_v4();

    let (tx1, mut rx1) = mpsc::channel(8);
    let (tx2, mut rx2) = mpsc::channel(8);
    registry.register(tenant_id, tx1).await.unwrap();
    registry.register(tenant_id, tx2).await.unwrap();

    // When - Broadcasting to the tenant
    let delivered = registry
        .broadcast(tenant_id, Event::stock_alert(tenant_id, vec![]))
        .await;

    // Then - Both connections receive the event
    assert_eq!(delivered, 2);
    assert_eq!(rx1.recv().await.unwrap().kind(), EventKind::StockAlert);
    assert_eq!(rx2.recv().await.unwrap().kind(), EventKind::StockAlert);
}

#[tokio::test]
async fn given_connections_for_two_tenants_when_broadcast_then_no_cross_tenant_leakage() {
    // Given - One connection per tenant
    let registry = create_registry(ConnectionLimits::default(), StreamConfig::default());
    let tenant_a = Uuid::new_v4();
    let tenant_b = Uuid::new_v4();

    let (tx_a, mut rx_a) = mpsc::channel(8);
    let (tx_b, mut rx_b) = mpsc::channel(8);
    registry.register(tenant_a, tx_a).await.unwrap();
    registry.register(tenant_b, tx_b).await.unwrap();

    // When - Broadcasting to tenant A only
    let delivered = registry
        .broadcast(tenant_a, Event::stock_alert(tenant_a, vec![]))
        .await;

    // Then - Only tenant A's connection receives it
    assert_eq!(delivered, 1);
    assert_eq!(rx_a.recv().await.unwrap().tenant_id, tenant_a);
    assert!(
        rx_b.try_recv().is_err(),
        "Tenant B must never see tenant A events"
    );
}

#[tokio::test]
async fn given_one_dead_connection_when_broadcast_then_others_still_receive() {
    // Given - Two connections for a tenant, one with a dropped receiver
    let registry = create_registry(ConnectionLimits::default(), StreamConfig::default());
    let tenant_id = Uuid::new_v4();

    let (tx_dead, rx_dead) = mpsc::channel(8);
    let (tx_live, mut rx_live) = mpsc::channel(8);
    registry.register(tenant_id, tx_dead).await.unwrap();
    let live_id = registry.register(tenant_id, tx_live).await.unwrap();
    drop(rx_dead);

    // When - Broadcasting
    let delivered = registry
        .broadcast(tenant_id, Event::heartbeat(tenant_id, 2, 0))
        .await;

    // Then - The live connection still receives; the dead one is removed
    assert_eq!(delivered, 1);
    assert_eq!(rx_live.recv().await.unwrap().kind(), EventKind::Heartbeat);
    assert_eq!(registry.total_count().await, 1);
    assert!(registry.contains(&live_id).await);
}

#[tokio::test]
async fn given_closed_sink_when_send_then_connection_removed() {
    // Given - A connection whose receiver has been dropped
    let registry = create_registry(ConnectionLimits::default(), StreamConfig::default());
    let tenant_id = Uuid::new_v4();

    let (tx, rx) = mpsc::channel(8);
    let connection_id = registry.register(tenant_id, tx).await.unwrap();
    drop(rx);

    // When - Sending
    let result = registry
        .send(&connection_id, Event::heartbeat(tenant_id, 1, 0))
        .await;

    // Then - The connection is gone from the registry
    assert!(matches!(result, Err(StreamError::ConnectionClosed { .. })));
    assert!(!registry.contains(&connection_id).await);
    assert_eq!(registry.total_count().await, 0);
}

#[tokio::test]
async fn given_stalled_sink_when_consecutive_sends_fail_then_connection_closed() {
    // Given - A connection with a 1-slot buffer that is never drained
    let registry = create_registry(
        ConnectionLimits::default(),
        StreamConfig {
            send_buffer_size: 1,
            max_send_failures: 3,
        },
    );
    let tenant_id = Uuid::new_v4();

    let (tx, _rx) = mpsc::channel(1);
    let connection_id = registry.register(tenant_id, tx).await.unwrap();

    // When - Filling the buffer, then failing three consecutive sends
    registry
        .send(&connection_id, Event::heartbeat(tenant_id, 1, 0))
        .await
        .unwrap();

    for _ in 0..2 {
        // Tolerated: event dropped, connection stays open
        registry
            .send(&connection_id, Event::heartbeat(tenant_id, 1, 0))
            .await
            .unwrap();
        assert!(registry.contains(&connection_id).await);
    }

    let result = registry
        .send(&connection_id, Event::heartbeat(tenant_id, 1, 0))
        .await;

    // Then - The third consecutive failure closes the connection
    assert!(matches!(result, Err(StreamError::SendBufferFull { .. })));
    assert!(!registry.contains(&connection_id).await);
}

#[tokio::test]
async fn given_unknown_connection_when_send_then_connection_closed_error() {
    let state = create_test_state().await;
    let tenant_id = Uuid::new_v4();

    let (tx, _rx) = mpsc::channel(8);
    let connection_id = state.registry.register(tenant_id, tx).await.unwrap();
    state.registry.unregister(&connection_id).await;

    let result = state
        .registry
        .send(&connection_id, Event::heartbeat(tenant_id, 0, 0))
        .await;

    assert!(matches!(result, Err(StreamError::ConnectionClosed { .. })));
}
