//! Medicine REST API handlers
//!
//! Tenant-scoped inventory CRUD. Every successful mutation broadcasts the
//! matching notification event to the tenant's live monitor subscribers.

use crate::{
    ApiError, ApiResult, CreateMedicineRequest, DeleteResponse, MedicineDto,
    MedicineListResponse, MedicineResponse, UpdateMedicineRequest,
};

use rx_core::{Event, Medicine, Tenant};
use rx_db::{MedicineRepository, TenantRepository};
use rx_stream::AppState;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/v1/{subdomain}/medicines
///
/// List the tenant's live inventory
pub async fn list_medicines(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> ApiResult<Json<MedicineListResponse>> {
    let tenant = resolve_tenant(&state, &subdomain).await?;

    let repo = MedicineRepository::new(state.pool.clone());
    let medicines = repo.find_all(tenant.id).await?;

    Ok(Json(MedicineListResponse {
        medicines: medicines.into_iter().map(MedicineDto::from).collect(),
    }))
}

/// GET /api/v1/{subdomain}/medicines/{id}
///
/// Get a single medicine by ID
pub async fn get_medicine(
    State(state): State<AppState>,
    Path((subdomain, id)): Path<(String, String)>,
) -> ApiResult<Json<MedicineResponse>> {
    let tenant = resolve_tenant(&state, &subdomain).await?;
    let medicine_id = Uuid::parse_str(&id)?;

    let repo = MedicineRepository::new(state.pool.clone());
    let medicine = repo
        .find_by_id(tenant.id, medicine_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Medicine {id} not found")))?;

    Ok(Json(MedicineResponse {
        medicine: medicine.into(),
    }))
}

/// POST /api/v1/{subdomain}/medicines
///
/// Create a medicine and notify live subscribers
pub async fn create_medicine(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
    Json(request): Json<CreateMedicineRequest>,
) -> ApiResult<(StatusCode, Json<MedicineResponse>)> {
    let tenant = resolve_tenant(&state, &subdomain).await?;

    if request.name.trim().is_empty() {
        return Err(ApiError::validation("name must not be empty"));
    }
    if request.stock < 0 || request.min_stock < 0 {
        return Err(ApiError::validation("stock levels must not be negative"));
    }
    let expiry_date = parse_timestamp(request.expiry_date)?;

    let mut medicine = Medicine::new(
        tenant.id,
        request.name.trim(),
        request.stock,
        request.min_stock,
        expiry_date,
    );
    medicine.category = request.category;
    medicine.price_cents = request.price_cents;

    let repo = MedicineRepository::new(state.pool.clone());
    repo.create(&medicine).await?;

    state
        .registry
        .broadcast(tenant.id, Event::medicine_created(tenant.id, &medicine))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(MedicineResponse {
            medicine: medicine.into(),
        }),
    ))
}

/// PUT /api/v1/{subdomain}/medicines/{id}
///
/// Update a medicine and notify live subscribers
pub async fn update_medicine(
    State(state): State<AppState>,
    Path((subdomain, id)): Path<(String, String)>,
    Json(request): Json<UpdateMedicineRequest>,
) -> ApiResult<Json<MedicineResponse>> {
    let tenant = resolve_tenant(&state, &subdomain).await?;
    let medicine_id = Uuid::parse_str(&id)?;

    let repo = MedicineRepository::new(state.pool.clone());
    let mut medicine = repo
        .find_by_id(tenant.id, medicine_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Medicine {id} not found")))?;

    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("name must not be empty"));
        }
        medicine.name = name.trim().to_string();
    }
    if let Some(category) = request.category {
        medicine.category = Some(category);
    }
    if let Some(stock) = request.stock {
        if stock < 0 {
            return Err(ApiError::validation("stock must not be negative"));
        }
        medicine.stock = stock;
    }
    if let Some(min_stock) = request.min_stock {
        if min_stock < 0 {
            return Err(ApiError::validation("min_stock must not be negative"));
        }
        medicine.min_stock = min_stock;
    }
    if let Some(price_cents) = request.price_cents {
        medicine.price_cents = price_cents;
    }
    if let Some(expiry_date) = request.expiry_date {
        medicine.expiry_date = parse_timestamp(expiry_date)?;
    }
    medicine.updated_at = Utc::now();

    repo.update(&medicine).await?;

    state
        .registry
        .broadcast(tenant.id, Event::medicine_updated(tenant.id, &medicine))
        .await;

    Ok(Json(MedicineResponse {
        medicine: medicine.into(),
    }))
}

/// DELETE /api/v1/{subdomain}/medicines/{id}
///
/// Soft-delete a medicine and notify live subscribers
pub async fn delete_medicine(
    State(state): State<AppState>,
    Path((subdomain, id)): Path<(String, String)>,
) -> ApiResult<Json<DeleteResponse>> {
    let tenant = resolve_tenant(&state, &subdomain).await?;
    let medicine_id = Uuid::parse_str(&id)?;

    let repo = MedicineRepository::new(state.pool.clone());
    let medicine = repo
        .find_by_id(tenant.id, medicine_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Medicine {id} not found")))?;

    repo.soft_delete(tenant.id, medicine_id, Utc::now()).await?;

    state
        .registry
        .broadcast(tenant.id, Event::medicine_deleted(tenant.id, &medicine))
        .await;

    Ok(Json(DeleteResponse {
        deleted: true,
        id,
    }))
}

// =============================================================================
// Helpers
// =============================================================================

async fn resolve_tenant(state: &AppState, subdomain: &str) -> ApiResult<Tenant> {
    TenantRepository::new(state.pool.clone())
        .find_by_subdomain(subdomain)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Tenant {subdomain} not found")))
}

fn parse_timestamp(seconds: i64) -> ApiResult<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| ApiError::validation(format!("Invalid timestamp: {seconds}")))
}
