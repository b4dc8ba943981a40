use crate::state::{EVENT_HISTORY_LIMIT, MonitorState};

use rx_core::{Event, EventKind, ExpiryAlertItem, StockAlertItem};

use chrono::{Duration, Utc};
use uuid::Uuid;

fn stock_item(name: &str) -> StockAlertItem {
    StockAlertItem {
        id: Uuid::new_v4(),
        name: name.to_string(),
        stock: 1,
        min_stock: 10,
        urgency: None,
    }
}

fn expiry_item(name: &str, days: i64) -> ExpiryAlertItem {
    ExpiryAlertItem {
        id: Uuid::new_v4(),
        name: name.to_string(),
        expiry_date: Utc::now() + Duration::days(days),
        days_until_expiry: days,
        urgency: None,
    }
}

#[test]
fn test_connection_established_sets_identity_and_resets_attempts() {
    let tenant_id = Uuid::new_v4();
    let mut state = MonitorState {
        reconnect_attempts: 4,
        ..MonitorState::default()
    };

    state.apply(Event::connection_established(tenant_id, "c-1".to_string()));

    assert!(state.connected);
    assert_eq!(state.connection_id.as_deref(), Some("c-1"));
    assert_eq!(state.reconnect_attempts, 0);
}

#[test]
fn test_history_is_bounded_and_newest_first() {
    let tenant_id = Uuid::new_v4();
    let mut state = MonitorState::default();

    for i in 0..60 {
        state.apply(Event::heartbeat(tenant_id, i, 0));
    }

    assert_eq!(state.events.len(), EVENT_HISTORY_LIMIT);

    // Newest first: the last heartbeat applied leads the ring
    match &state.events[0].payload {
        rx_core::EventPayload::Heartbeat(hb) => assert_eq!(hb.active_connections, Some(59)),
        other => panic!("unexpected payload: {other:?}"),
    }
    match &state.events[EVENT_HISTORY_LIMIT - 1].payload {
        rx_core::EventPayload::Heartbeat(hb) => assert_eq!(hb.active_connections, Some(10)),
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[test]
fn test_stock_alerts_replaced_wholesale() {
    let tenant_id = Uuid::new_v4();
    let mut state = MonitorState::default();

    state.apply(Event::stock_alert(
        tenant_id,
        vec![stock_item("A"), stock_item("B"), stock_item("C")],
    ));
    assert!(state.has_stock_alerts());
    assert_eq!(state.stock_alerts.len(), 3);

    // A later alert with an empty set replaces, not accumulates
    state.apply(Event::stock_alert(tenant_id, vec![]));
    assert!(!state.has_stock_alerts());
    assert!(state.stock_alerts.is_empty());
}

#[test]
fn test_expiry_alerts_replaced_wholesale() {
    let tenant_id = Uuid::new_v4();
    let mut state = MonitorState::default();

    state.apply(Event::expiry_alert(tenant_id, vec![expiry_item("A", 5)]));
    state.apply(Event::expiry_alert(tenant_id, vec![expiry_item("B", 2)]));

    assert_eq!(state.expiry_alerts.len(), 1);
    assert_eq!(state.expiry_alerts[0].name, "B");
    assert!(state.has_expiry_alerts());
}

#[test]
fn test_heartbeat_retains_counters_when_absent() {
    let tenant_id = Uuid::new_v4();
    let mut state = MonitorState::default();

    state.apply(Event::heartbeat(tenant_id, 3, 120));
    assert_eq!(state.active_connections, Some(3));
    assert_eq!(state.medicine_count, Some(120));
    let first_heartbeat_at = state.last_heartbeat.unwrap();

    // A heartbeat without counters updates the timestamp only
    let bare = serde_json::from_value::<Event>(serde_json::json!({
        "type": "heartbeat",
        "data": {},
        "timestamp": (Utc::now() + Duration::seconds(10)).to_rfc3339(),
        "tenantId": tenant_id.to_string(),
    }))
    .unwrap();
    state.apply(bare);

    assert_eq!(state.active_connections, Some(3));
    assert_eq!(state.medicine_count, Some(120));
    assert!(state.last_heartbeat.unwrap() > first_heartbeat_at);
}

#[test]
fn test_crud_events_recorded_in_history_only() {
    let tenant_id = Uuid::new_v4();
    let medicine = rx_core::Medicine::new(
        tenant_id,
        "Aspirin",
        50,
        10,
        Utc::now() + Duration::days(120),
    );

    let mut state = MonitorState::default();
    state.apply(Event::medicine_created(tenant_id, &medicine));

    assert_eq!(state.events.len(), 1);
    assert!(!state.has_stock_alerts());
    assert!(!state.has_expiry_alerts());
    assert_eq!(state.events_of_kind(EventKind::MedicineCreated).len(), 1);
}

#[test]
fn test_derived_accessors() {
    let tenant_id = Uuid::new_v4();
    let mut state = MonitorState::default();

    state.apply(Event::heartbeat(tenant_id, 1, 0));
    state.apply(Event::stock_alert(tenant_id, vec![stock_item("A")]));
    state.apply(Event::heartbeat(tenant_id, 1, 0));

    assert_eq!(state.events_of_kind(EventKind::Heartbeat).len(), 2);
    assert_eq!(state.events_of_kind(EventKind::StockAlert).len(), 1);
    assert_eq!(state.recent_events(2).len(), 2);
    assert_eq!(state.recent_events(2)[0].kind(), EventKind::Heartbeat);
}

#[test]
fn test_critical_alerts_empty_when_urgency_not_populated() {
    let tenant_id = Uuid::new_v4();
    let mut state = MonitorState::default();

    // Today's broadcaster never sets urgency
    state.apply(Event::stock_alert(
        tenant_id,
        vec![stock_item("A"), stock_item("B")],
    ));
    assert!(state.critical_stock_alerts().is_empty());
    assert!(state.critical_expiry_alerts().is_empty());

    // A future severity policy would surface here
    state.stock_alerts[0].urgency = Some("critical".to_string());
    assert_eq!(state.critical_stock_alerts().len(), 1);
}

#[test]
fn test_clear_operations_are_local_resets() {
    let tenant_id = Uuid::new_v4();
    let mut state = MonitorState::default();

    state.apply(Event::stock_alert(tenant_id, vec![stock_item("A")]));
    state.apply(Event::expiry_alert(tenant_id, vec![expiry_item("B", 3)]));

    state.clear_stock_alerts();
    assert!(!state.has_stock_alerts());
    assert!(state.has_expiry_alerts());

    state.clear_expiry_alerts();
    assert!(!state.has_expiry_alerts());

    state.clear_history();
    assert!(state.events.is_empty());
}

#[test]
fn test_mark_disconnected_keeps_derived_data() {
    let tenant_id = Uuid::new_v4();
    let mut state = MonitorState::default();

    state.apply(Event::connection_established(tenant_id, "c-1".to_string()));
    state.apply(Event::stock_alert(tenant_id, vec![stock_item("A")]));

    state.mark_disconnected();

    assert!(!state.connected);
    assert_eq!(state.connection_id, None);
    // Alerts and history survive a transport drop
    assert!(state.has_stock_alerts());
    assert_eq!(state.events.len(), 2);
}
