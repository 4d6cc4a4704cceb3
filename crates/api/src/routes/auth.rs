//! Registration and email verification handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use skybook_core::UserId;

use crate::error::{ApiJson, Result};
use crate::models::{RegisterInput, VerifiedUser};
use crate::state::AppState;
use crate::validation::ValidationErrors;

// =============================================================================
// Request Types
// =============================================================================

/// Verification form data.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub user_id: Option<UserId>,
    pub otp: Option<String>,
}

/// Resend request data.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendOtpRequest {
    pub user_id: Option<UserId>,
}

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user_id: UserId,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub message: &'static str,
    pub user: VerifiedUser,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/register`
#[instrument(skip(state, input))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterInput>,
) -> Result<Json<RegisterResponse>> {
    let user = state.verification().register(input).await?;

    Ok(Json(RegisterResponse {
        message: "Registration successful. Please check your email for verification code.",
        user_id: user.id,
    }))
}

/// `POST /api/verify-otp`
#[instrument(skip(state, input))]
pub async fn verify_otp(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>> {
    let otp = input.otp.filter(|otp| !otp.trim().is_empty());
    let (Some(user_id), Some(otp)) = (input.user_id, otp) else {
        return Err(ValidationErrors::new("User ID and OTP are required").into());
    };

    let user = state.verification().verify_code(user_id, &otp).await?;

    Ok(Json(VerifyOtpResponse {
        message: "Email verified successfully",
        user: VerifiedUser::from(&user),
    }))
}

/// `POST /api/resend-otp`
#[instrument(skip(state, input))]
pub async fn resend_otp(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ResendOtpRequest>,
) -> Result<Json<Value>> {
    let user_id = input
        .user_id
        .ok_or_else(|| ValidationErrors::single("User ID is required", "userId", "Required"))?;

    state.verification().issue_code(user_id).await?;

    Ok(Json(json!({ "message": "OTP sent successfully" })))
}
