use rx_core::Medicine;

use serde::Serialize;

/// Medicine DTO for JSON serialization
#[derive(Debug, Serialize)]
pub struct MedicineDto {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub stock: i64,
    pub min_stock: i64,
    pub price_cents: i64,
    pub expiry_date: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Medicine> for MedicineDto {
    fn from(m: Medicine) -> Self {
        Self {
            id: m.id.to_string(),
            name: m.name,
            category: m.category,
            stock: m.stock,
            min_stock: m.min_stock,
            price_cents: m.price_cents,
            expiry_date: m.expiry_date.timestamp(),
            created_at: m.created_at.timestamp(),
            updated_at: m.updated_at.timestamp(),
        }
    }
}
