use crate::MedicineDto;
use serde::Serialize;

/// List of medicines response
#[derive(Debug, Serialize)]
pub struct MedicineListResponse {
    pub medicines: Vec<MedicineDto>,
}
