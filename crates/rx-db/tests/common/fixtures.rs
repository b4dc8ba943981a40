use rx_core::{Medicine, Tenant};
use rx_db::TenantRepository;

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Inserts an active tenant and returns it
pub async fn create_test_tenant(pool: &SqlitePool, subdomain: &str) -> Tenant {
    let tenant = Tenant::new(subdomain, format!("{subdomain} Pharmacy"))
        .expect("valid test subdomain");

    TenantRepository::new(pool.clone())
        .create(&tenant)
        .await
        .expect("Failed to create test tenant");

    tenant
}

/// A medicine expiring comfortably far in the future with healthy stock
pub fn create_test_medicine(tenant_id: Uuid, name: &str) -> Medicine {
    Medicine::new(tenant_id, name, 100, 10, Utc::now() + Duration::days(365))
}
