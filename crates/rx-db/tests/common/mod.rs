pub mod fixtures;
pub mod test_db;

pub use fixtures::{create_test_medicine, create_test_tenant};
pub use test_db::create_test_pool;
