//! User lookup handler.

use axum::{Json, extract::State};

use skybook_core::UserId;

use crate::error::{ApiPath, AppError, Result};
use crate::models::PublicUser;
use crate::state::AppState;

/// `GET /api/user/{id}`
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<PublicUser>> {
    let user = state
        .store()
        .users()
        .get_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    Ok(Json(PublicUser::from(&user)))
}
