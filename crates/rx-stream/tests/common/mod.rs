#![allow(dead_code)]

pub mod test_db;
pub mod test_state;

pub use test_db::{create_test_medicine, create_test_pool, create_test_tenant};
pub use test_state::{create_test_state, create_test_state_with, test_router};
