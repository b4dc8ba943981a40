pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api::{
    delete_response::DeleteResponse,
    error::ApiError,
    error::Result as ApiResult,
    medicines::{
        create_medicine_request::CreateMedicineRequest,
        medicine_dto::MedicineDto,
        medicine_list_response::MedicineListResponse,
        medicine_response::MedicineResponse,
        medicines::{
            create_medicine, delete_medicine, get_medicine, list_medicines, update_medicine,
        },
        update_medicine_request::UpdateMedicineRequest,
    },
};

pub use crate::config::Config;
pub use crate::error::ServerError;
pub use crate::routes::build_router;
