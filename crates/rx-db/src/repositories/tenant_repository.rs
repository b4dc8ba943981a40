//! Tenant repository - subdomain resolution and lifecycle.

use crate::{DbError, Result as DbErrorResult};

use rx_core::Tenant;

use chrono::DateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct TenantRepository {
    pool: SqlitePool,
}

impl TenantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, tenant: &Tenant) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                INSERT INTO tenants (id, subdomain, name, active, created_at)
                VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(tenant.id.to_string())
        .bind(&tenant.subdomain)
        .bind(&tenant.name)
        .bind(tenant.active)
        .bind(tenant.created_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Resolve a routing subdomain to its tenant. Deactivated tenants do
    /// not resolve - their data stays, routing stops.
    pub async fn find_by_subdomain(&self, subdomain: &str) -> DbErrorResult<Option<Tenant>> {
        let row = sqlx::query(
            r#"
                SELECT id, subdomain, name, active, created_at
                FROM tenants
                WHERE subdomain = ? AND active = 1
            "#,
        )
        .bind(subdomain)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| tenant_from_row(&r)).transpose()
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<Tenant>> {
        let row = sqlx::query(
            r#"
                SELECT id, subdomain, name, active, created_at
                FROM tenants
                WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| tenant_from_row(&r)).transpose()
    }

    /// Soft-deactivate: the row survives, subdomain resolution stops.
    pub async fn deactivate(&self, id: Uuid) -> DbErrorResult<()> {
        sqlx::query("UPDATE tenants SET active = 0 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn tenant_from_row(row: &SqliteRow) -> DbErrorResult<Tenant> {
    let id: String = row.try_get("id")?;
    let created_at: i64 = row.try_get("created_at")?;

    Ok(Tenant {
        id: Uuid::parse_str(&id)
            .map_err(|e| DbError::decode(format!("Invalid UUID in tenants.id: {e}")))?,
        subdomain: row.try_get("subdomain")?,
        name: row.try_get("name")?,
        active: row.try_get("active")?,
        created_at: DateTime::from_timestamp(created_at, 0)
            .ok_or_else(|| DbError::decode("Invalid timestamp in tenants.created_at"))?,
    })
}
