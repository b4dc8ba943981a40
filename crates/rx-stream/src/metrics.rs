use rx_core::EventKind;

use metrics::{counter, gauge};

/// Metrics collector for the monitor stream
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            prefix: "rx_stream",
        }
    }

    /// Record new connection established
    pub fn connection_established(&self) {
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).increment(1.0);
    }

    /// Record connection closed
    pub fn connection_closed(&self) {
        counter!(format!("{}.connections.closed", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).decrement(1.0);
    }

    /// Record event delivered to a single connection
    pub fn event_sent(&self, kind: EventKind) {
        counter!(format!("{}.events.sent", self.prefix)).increment(1);
        counter!(format!("{}.events.sent.{}", self.prefix, kind)).increment(1);
    }

    /// Record event dropped on a full send buffer
    pub fn event_dropped(&self, kind: EventKind) {
        counter!(format!("{}.events.dropped", self.prefix)).increment(1);
        counter!(format!("{}.events.dropped.{}", self.prefix, kind)).increment(1);
    }

    /// Record broadcast fan-out
    pub fn broadcast_published(&self, kind: EventKind, receiver_count: usize) {
        counter!(format!("{}.broadcast.published", self.prefix)).increment(1);
        counter!(format!("{}.broadcast.published.{}", self.prefix, kind)).increment(1);
        gauge!(format!("{}.broadcast.receivers", self.prefix)).set(receiver_count as f64);
    }

    /// Record a failed scan tick
    pub fn scan_error(&self) {
        counter!(format!("{}.scan.errors", self.prefix)).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
