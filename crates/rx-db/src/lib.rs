pub mod error;
pub mod repositories;

pub use error::{DbError, Result};
pub use repositories::medicine_repository::MedicineRepository;
pub use repositories::tenant_repository::TenantRepository;
