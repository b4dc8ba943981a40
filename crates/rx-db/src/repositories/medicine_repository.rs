//! Medicine repository - tenant-scoped inventory CRUD plus the three read
//! paths the alert scanner depends on (under-stock, expiring, live count).
//!
//! Every query filters `deleted_at IS NULL`; soft-deleted rows are invisible
//! to alerts, counts and lookups alike.

use crate::{DbError, Result as DbErrorResult};

use rx_core::Medicine;

use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT id, tenant_id, name, category, stock, min_stock, price_cents,
        expiry_date, created_at, updated_at, deleted_at
    FROM medicines
"#;

pub struct MedicineRepository {
    pool: SqlitePool,
}

impl MedicineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, medicine: &Medicine) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                INSERT INTO medicines (
                    id, tenant_id, name, category, stock, min_stock, price_cents,
                    expiry_date, created_at, updated_at, deleted_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(medicine.id.to_string())
        .bind(medicine.tenant_id.to_string())
        .bind(&medicine.name)
        .bind(&medicine.category)
        .bind(medicine.stock)
        .bind(medicine.min_stock)
        .bind(medicine.price_cents)
        .bind(medicine.expiry_date.timestamp())
        .bind(medicine.created_at.timestamp())
        .bind(medicine.updated_at.timestamp())
        .bind(medicine.deleted_at.map(|dt| dt.timestamp()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, medicine: &Medicine) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                UPDATE medicines
                SET name = ?, category = ?, stock = ?, min_stock = ?,
                    price_cents = ?, expiry_date = ?, updated_at = ?
                WHERE id = ? AND tenant_id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&medicine.name)
        .bind(&medicine.category)
        .bind(medicine.stock)
        .bind(medicine.min_stock)
        .bind(medicine.price_cents)
        .bind(medicine.expiry_date.timestamp())
        .bind(medicine.updated_at.timestamp())
        .bind(medicine.id.to_string())
        .bind(medicine.tenant_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn soft_delete(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                UPDATE medicines
                SET deleted_at = ?
                WHERE id = ? AND tenant_id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(deleted_at.timestamp())
        .bind(id.to_string())
        .bind(tenant_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> DbErrorResult<Option<Medicine>> {
        let query = format!("{SELECT_COLUMNS} WHERE id = ? AND tenant_id = ? AND deleted_at IS NULL");

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .bind(tenant_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| medicine_from_row(&r)).transpose()
    }

    pub async fn find_all(&self, tenant_id: Uuid) -> DbErrorResult<Vec<Medicine>> {
        let query = format!("{SELECT_COLUMNS} WHERE tenant_id = ? AND deleted_at IS NULL ORDER BY name");

        let rows = sqlx::query(&query)
            .bind(tenant_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(medicine_from_row).collect()
    }

    /// Items at or below their configured minimum stock. The result is the
    /// complete current under-stock set, not a delta.
    pub async fn below_minimum(&self, tenant_id: Uuid) -> DbErrorResult<Vec<Medicine>> {
        let query = format!(
            "{SELECT_COLUMNS} WHERE tenant_id = ? AND deleted_at IS NULL AND stock <= min_stock ORDER BY name"
        );

        let rows = sqlx::query(&query)
            .bind(tenant_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(medicine_from_row).collect()
    }

    /// Items whose expiry date falls within the next `days` days,
    /// inclusive. No lower bound: already-expired items keep alerting
    /// until they leave stock.
    pub async fn expiring_within(
        &self,
        tenant_id: Uuid,
        days: i64,
        now: DateTime<Utc>,
    ) -> DbErrorResult<Vec<Medicine>> {
        let cutoff = (now + Duration::days(days)).timestamp();
        let query = format!(
            "{SELECT_COLUMNS} WHERE tenant_id = ? AND deleted_at IS NULL AND expiry_date <= ? ORDER BY expiry_date"
        );

        let rows = sqlx::query(&query)
            .bind(tenant_id.to_string())
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(medicine_from_row).collect()
    }

    /// Live (non-deleted) medicine count for the tenant.
    pub async fn count_active(&self, tenant_id: Uuid) -> DbErrorResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM medicines WHERE tenant_id = ? AND deleted_at IS NULL",
        )
        .bind(tenant_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

fn medicine_from_row(row: &SqliteRow) -> DbErrorResult<Medicine> {
    let id: String = row.try_get("id")?;
    let tenant_id: String = row.try_get("tenant_id")?;
    let expiry_date: i64 = row.try_get("expiry_date")?;
    let created_at: i64 = row.try_get("created_at")?;
    let updated_at: i64 = row.try_get("updated_at")?;
    let deleted_at: Option<i64> = row.try_get("deleted_at")?;

    Ok(Medicine {
        id: Uuid::parse_str(&id)
            .map_err(|e| DbError::decode(format!("Invalid UUID in medicines.id: {e}")))?,
        tenant_id: Uuid::parse_str(&tenant_id)
            .map_err(|e| DbError::decode(format!("Invalid UUID in medicines.tenant_id: {e}")))?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        stock: row.try_get("stock")?,
        min_stock: row.try_get("min_stock")?,
        price_cents: row.try_get("price_cents")?,
        expiry_date: DateTime::from_timestamp(expiry_date, 0)
            .ok_or_else(|| DbError::decode("Invalid timestamp in medicines.expiry_date"))?,
        created_at: DateTime::from_timestamp(created_at, 0)
            .ok_or_else(|| DbError::decode("Invalid timestamp in medicines.created_at"))?,
        updated_at: DateTime::from_timestamp(updated_at, 0)
            .ok_or_else(|| DbError::decode("Invalid timestamp in medicines.updated_at"))?,
        deleted_at: deleted_at.and_then(|ts| DateTime::from_timestamp(ts, 0)),
    })
}
