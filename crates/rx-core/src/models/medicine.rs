//! Medicine entity - one inventory item, scoped to a tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An inventory item. Stock and expiry drive the live alert scans:
/// `stock <= min_stock` raises a stock alert, an `expiry_date` inside the
/// configured window raises an expiry alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub stock: i64,
    /// Reorder threshold configured per item
    pub min_stock: i64,
    pub price_cents: i64,
    pub expiry_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Medicine {
    /// Create a new medicine with default stock levels.
    pub fn new(
        tenant_id: Uuid,
        name: impl Into<String>,
        stock: i64,
        min_stock: i64,
        expiry_date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            name: name.into(),
            category: None,
            stock,
            min_stock,
            price_cents: 0,
            expiry_date,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Check if medicine is deleted (soft delete)
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// At or below the configured minimum
    pub fn is_below_minimum(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Whole days until expiry, rounded up; 0 when expiring right now,
    /// negative once expired.
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        // `i64::div_ceil` is still unstable; `-((-x).div_euclid(d))` is the
        // stable, behavior-identical equivalent of `x.div_ceil(d)` for d > 0.
        -(-(self.expiry_date.timestamp() - now.timestamp())).div_euclid(86_400)
    }
}
