use crate::MedicineDto;
use serde::Serialize;

/// Single medicine response
#[derive(Debug, Serialize)]
pub struct MedicineResponse {
    pub medicine: MedicineDto,
}
