//! Public service catalog handlers.

use axum::{Json, extract::State};

use skybook_core::ServiceId;

use crate::error::{ApiPath, AppError, Result};
use crate::models::Service;
use crate::state::AppState;

/// `GET /api/services` - active services only.
pub async fn list_services(State(state): State<AppState>) -> Json<Vec<Service>> {
    Json(state.store().services().list_active().await)
}

/// `GET /api/services/{id}` - any service, active or not.
pub async fn get_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ServiceId>,
) -> Result<Json<Service>> {
    state
        .store()
        .services()
        .get_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Service not found".to_owned()))
}
