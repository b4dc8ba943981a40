use serde::Deserialize;

/// Partial update; absent fields keep their current values
#[derive(Debug, Deserialize)]
pub struct UpdateMedicineRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub stock: Option<i64>,

    #[serde(default)]
    pub min_stock: Option<i64>,

    #[serde(default)]
    pub price_cents: Option<i64>,

    /// Expiry date as Unix seconds
    #[serde(default)]
    pub expiry_date: Option<i64>,
}
