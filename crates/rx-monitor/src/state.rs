//! Folded view of one tenant's monitor stream.

use rx_core::{Event, EventKind, EventPayload, ExpiryAlertItem, StockAlertItem};

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Bounded ring of most recent events, newest first
pub const EVENT_HISTORY_LIMIT: usize = 50;

const CRITICAL_URGENCY: &str = "critical";

/// Derived state a consumer reads: connection status, bounded event
/// history, and the current alert sets. Alert lists are replaced wholesale
/// on every alert event - the latest event carries the full current set.
#[derive(Debug, Clone, Default)]
pub struct MonitorState {
    pub connected: bool,
    pub connection_id: Option<String>,
    pub last_heartbeat: Option<DateTime<Utc>>,
    /// Most recent events, newest first, truncated to EVENT_HISTORY_LIMIT
    pub events: VecDeque<Event>,
    pub stock_alerts: Vec<StockAlertItem>,
    pub expiry_alerts: Vec<ExpiryAlertItem>,
    pub medicine_count: Option<i64>,
    pub active_connections: Option<u64>,
    pub reconnect_attempts: u32,
}

impl MonitorState {
    /// Fold one inbound event into the state.
    pub fn apply(&mut self, event: Event) {
        match &event.payload {
            EventPayload::ConnectionEstablished(info) => {
                self.connected = true;
                self.connection_id = Some(info.connection_id.clone());
                self.reconnect_attempts = 0;
            }
            EventPayload::Heartbeat(heartbeat) => {
                self.last_heartbeat = Some(event.timestamp);
                // Only overwrite counters the event actually supplies
                if let Some(count) = heartbeat.active_connections {
                    self.active_connections = Some(count);
                }
                if let Some(count) = heartbeat.medicine_count {
                    self.medicine_count = Some(count);
                }
            }
            EventPayload::StockAlert(alert) => {
                self.stock_alerts = alert.medicines.clone();
            }
            EventPayload::ExpiryAlert(alert) => {
                self.expiry_alerts = alert.medicines.clone();
            }
            // CRUD notifications are recorded in history only
            EventPayload::MedicineCreated(_)
            | EventPayload::MedicineUpdated(_)
            | EventPayload::MedicineDeleted(_) => {}
        }

        self.events.push_front(event);
        self.events.truncate(EVENT_HISTORY_LIMIT);
    }

    /// Transport is gone: clear connection identity, keep derived data.
    pub fn mark_disconnected(&mut self) {
        self.connected = false;
        self.connection_id = None;
    }

    pub fn has_stock_alerts(&self) -> bool {
        !self.stock_alerts.is_empty()
    }

    pub fn has_expiry_alerts(&self) -> bool {
        !self.expiry_alerts.is_empty()
    }

    /// Events of one kind, newest first
    pub fn events_of_kind(&self, kind: EventKind) -> Vec<&Event> {
        self.events.iter().filter(|e| e.kind() == kind).collect()
    }

    /// The `count` most recent events, newest first
    pub fn recent_events(&self, count: usize) -> Vec<&Event> {
        self.events.iter().take(count).collect()
    }

    /// Stock alerts tagged critical. The broadcaster does not populate
    /// urgency today, so this is empty until the server grows a severity
    /// policy.
    pub fn critical_stock_alerts(&self) -> Vec<&StockAlertItem> {
        self.stock_alerts
            .iter()
            .filter(|item| item.urgency.as_deref() == Some(CRITICAL_URGENCY))
            .collect()
    }

    /// Expiry alerts tagged critical; see `critical_stock_alerts`.
    pub fn critical_expiry_alerts(&self) -> Vec<&ExpiryAlertItem> {
        self.expiry_alerts
            .iter()
            .filter(|item| item.urgency.as_deref() == Some(CRITICAL_URGENCY))
            .collect()
    }

    pub fn clear_stock_alerts(&mut self) {
        self.stock_alerts.clear();
    }

    pub fn clear_expiry_alerts(&mut self) {
        self.expiry_alerts.clear();
    }

    pub fn clear_history(&mut self) {
        self.events.clear();
    }
}
