use rx_core::{Medicine, Tenant};
use rx_db::TenantRepository;

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

/// Creates an in-memory SQLite pool with migrations run
pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .expect("Failed to enable foreign keys");

    sqlx::migrate!("../rx-db/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Inserts an active tenant and returns it
pub async fn create_test_tenant(pool: &SqlitePool, subdomain: &str) -> Tenant {
    let tenant =
        Tenant::new(subdomain, format!("{subdomain} Pharmacy")).expect("valid test subdomain");

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
