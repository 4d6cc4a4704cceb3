//! Admin dashboard handlers: login, catalog management, bookings, stats.
//!
//! These routes are not gated by any session; the login endpoint only
//! checks the configured credential pair.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

use skybook_core::ServiceId;

use crate::error::{ApiJson, ApiPath, AppError, Result};
use crate::models::{AdminBooking, Service, ServiceInput, ServicePatch};
use crate::services::{AdminLoginInput, AdminProfile, AdminStats, admin_auth, stats};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub message: &'static str,
    pub admin: AdminProfile,
}

/// `POST /api/admin/login`
#[instrument(skip(state, input))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AdminLoginInput>,
) -> Result<Json<AdminLoginResponse>> {
    let admin = admin_auth::authenticate(&state.config().admin, &input)?;
    tracing::info!("Admin logged in");

    Ok(Json(AdminLoginResponse {
        message: "Admin login successful",
        admin,
    }))
}

/// `POST /api/admin/services`
#[instrument(skip(state, input))]
pub async fn create_service(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ServiceInput>,
) -> Result<(StatusCode, Json<Service>)> {
    let new = input.validate()?;
    let service = state.store().services().create(new).await;
    tracing::info!(service_id = %service.id, "Service created");
    Ok((StatusCode::CREATED, Json(service)))
}

/// `PUT /api/admin/services/{id}` - partial update.
#[instrument(skip(state, patch))]
pub async fn update_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ServiceId>,
    ApiJson(patch): ApiJson<ServicePatch>,
) -> Result<Json<Service>> {
    let patch = patch.validate()?;
    state
        .store()
        .services()
        .update(id, patch)
        .await
        .map(Json)
        .map_err(|_| AppError::NotFound("Service not found".to_owned()))
}

/// `DELETE /api/admin/services/{id}`
#[instrument(skip(state))]
pub async fn delete_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ServiceId>,
) -> Result<Json<Value>> {
    state
        .store()
        .services()
        .delete(id)
        .await
        .map_err(|_| AppError::NotFound("Service not found".to_owned()))?;

    Ok(Json(json!({ "message": "Service deleted successfully" })))
}

/// `GET /api/admin/bookings`
pub async fn list_bookings(State(state): State<AppState>) -> Json<Vec<AdminBooking>> {
    Json(state.bookings().all_bookings_enriched().await)
}

/// `GET /api/admin/stats`
pub async fn get_stats(State(state): State<AppState>) -> Json<AdminStats> {
    Json(stats::compute_stats(state.store()).await)
}
