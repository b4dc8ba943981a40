//! Wire model for the live monitor stream.
//!
//! Every message is one JSON object framed as an SSE `data:` line:
//! `{ "type": "...", "data": {...}, "timestamp": "...", "tenantId": "..." }`.
//! Alert payloads are full-state snapshots of the tenant's current alert
//! set, never deltas - a reconnecting client is consistent again after the
//! next scan tick.

use crate::Medicine;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One notification pushed to subscribers of a tenant's stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(flatten)]
    pub payload: EventPayload,
    /// ISO-8601 emission time
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "tenantId")]
    pub tenant_id: Uuid,
}

/// Typed payload, adjacently tagged as `type` + `data` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventPayload {
    MedicineCreated(MedicineNotice),
    MedicineUpdated(MedicineNotice),
    MedicineDeleted(MedicineNotice),
    StockAlert(StockAlert),
    ExpiryAlert(ExpiryAlert),
    ConnectionEstablished(ConnectionEstablished),
    Heartbeat(Heartbeat),
}

/// Event type discriminant, used for filtering, metrics and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MedicineCreated,
    MedicineUpdated,
    MedicineDeleted,
    StockAlert,
    ExpiryAlert,
    ConnectionEstablished,
    Heartbeat,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MedicineCreated => "medicine_created",
            Self::MedicineUpdated => "medicine_updated",
            Self::MedicineDeleted => "medicine_deleted",
            Self::StockAlert => "stock_alert",
            Self::ExpiryAlert => "expiry_alert",
            Self::ConnectionEstablished => "connection_established",
            Self::Heartbeat => "heartbeat",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a medicine CRUD notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineNotice {
    pub id: Uuid,
    pub name: String,
    pub stock: i64,
    pub min_stock: i64,
    pub expiry_date: DateTime<Utc>,
}

impl From<&Medicine> for MedicineNotice {
    fn from(m: &Medicine) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
            stock: m.stock,
            min_stock: m.min_stock,
            expiry_date: m.expiry_date,
        }
    }
}

/// One under-stocked item inside a stock alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlertItem {
    pub id: Uuid,
    pub name: String,
    pub stock: i64,
    pub min_stock: i64,
    /// Severity tier read by UIs; the broadcaster does not populate it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
}

/// Complete current under-stock set for the tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAlert {
    #[serde(default)]
    pub medicines: Vec<StockAlertItem>,
}

/// One soon-to-expire item inside an expiry alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryAlertItem {
    pub id: Uuid,
    pub name: String,
    pub expiry_date: DateTime<Utc>,
    /// ceil((expiry - now) / 1 day); 0 when expiring right now, negative
    /// once expired
    pub days_until_expiry: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
}

/// Complete current expiring set for the tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryAlert {
    #[serde(default)]
    pub medicines: Vec<ExpiryAlertItem>,
}

/// First event on every new subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEstablished {
    pub connection_id: String,
    pub tenant_id: Uuid,
}

/// Periodic liveness signal. Counters are optional on the wire; consumers
/// retain their previous values when a field is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heartbeat {
    /// Process-wide connection count, across all tenants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_connections: Option<u64>,
    /// Live (non-deleted) medicine count for this tenant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine_count: Option<i64>,
}

impl Event {
    fn now(payload: EventPayload, tenant_id: Uuid) -> Self {
        Self {
            payload,
            timestamp: Utc::now(),
            tenant_id,
        }
    }

    pub fn medicine_created(tenant_id: Uuid, medicine: &Medicine) -> Self {
        Self::now(EventPayload::MedicineCreated(medicine.into()), tenant_id)
    }

    pub fn medicine_updated(tenant_id: Uuid, medicine: &Medicine) -> Self {
        Self::now(EventPayload::MedicineUpdated(medicine.into()), tenant_id)
    }

    pub fn medicine_deleted(tenant_id: Uuid, medicine: &Medicine) -> Self {
        Self::now(EventPayload::MedicineDeleted(medicine.into()), tenant_id)
    }

    pub fn stock_alert(tenant_id: Uuid, medicines: Vec<StockAlertItem>) -> Self {
        Self::now(EventPayload::StockAlert(StockAlert { medicines }), tenant_id)
    }

    pub fn expiry_alert(tenant_id: Uuid, medicines: Vec<ExpiryAlertItem>) -> Self {
        Self::now(
            EventPayload::ExpiryAlert(ExpiryAlert { medicines }),
            tenant_id,
        )
    }

    pub fn connection_established(tenant_id: Uuid, connection_id: String) -> Self {
        Self::now(
            EventPayload::ConnectionEstablished(ConnectionEstablished {
                connection_id,
                tenant_id,
            }),
            tenant_id,
        )
    }

    pub fn heartbeat(tenant_id: Uuid, active_connections: u64, medicine_count: i64) -> Self {
        Self::now(
            EventPayload::Heartbeat(Heartbeat {
                active_connections: Some(active_connections),
                medicine_count: Some(medicine_count),
            }),
            tenant_id,
        )
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MedicineCreated(_) => EventKind::MedicineCreated,
            Self::MedicineUpdated(_) => EventKind::MedicineUpdated,
            Self::MedicineDeleted(_) => EventKind::MedicineDeleted,
            Self::StockAlert(_) => EventKind::StockAlert,
            Self::ExpiryAlert(_) => EventKind::ExpiryAlert,
            Self::ConnectionEstablished(_) => EventKind::ConnectionEstablished,
            Self::Heartbeat(_) => EventKind::Heartbeat,
        }
    }
}
