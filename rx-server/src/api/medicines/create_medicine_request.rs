use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateMedicineRequest {
    /// Medicine name (required)
    pub name: String,

    /// Optional category, e.g. "antibiotics"
    #[serde(default)]
    pub category: Option<String>,

    /// Units in stock (required)
    pub stock: i64,

    /// Reorder threshold (required)
    pub min_stock: i64,

    /// Price in cents
    #[serde(default)]
    pub price_cents: i64,

    /// Expiry date as Unix seconds (required)
    pub expiry_date: i64,
}
