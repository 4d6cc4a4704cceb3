//! Booking handlers used by the customer flow.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use skybook_core::{BookingId, NotificationKind, PaymentType, UserId};

use crate::error::{ApiJson, ApiPath, Result};
use crate::models::{Booking, BookingInput, BookingPatchInput, CostBreakdown, UserBooking};
use crate::state::AppState;
use crate::validation::ValidationErrors;

/// Notification request data.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub booking_id: Option<BookingId>,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub payment_type: PaymentType,
}

/// `POST /api/bookings`
#[instrument(skip(state, input))]
pub async fn create_booking(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<BookingInput>,
) -> Result<(StatusCode, Json<Booking>)> {
    let booking = state.bookings().create_booking(input).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// `GET /api/bookings/user/{user_id}`
pub async fn user_bookings(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Json<Vec<UserBooking>> {
    Json(state.bookings().user_bookings(user_id).await)
}

/// `GET /api/bookings/{id}/bill`
pub async fn booking_bill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BookingId>,
) -> Result<Json<CostBreakdown>> {
    Ok(Json(state.bookings().cost_breakdown(id).await?))
}

/// `PATCH /api/bookings/{id}`
#[instrument(skip(state, patch))]
pub async fn update_booking(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BookingId>,
    ApiJson(patch): ApiJson<BookingPatchInput>,
) -> Result<Json<Booking>> {
    Ok(Json(state.bookings().update_booking(id, patch).await?))
}

/// `POST /api/send-booking-notification`
#[instrument(skip(state, input))]
pub async fn send_notification(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NotificationRequest>,
) -> Result<Json<Value>> {
    let booking_id = input
        .booking_id
        .ok_or_else(|| ValidationErrors::single("Booking ID is required", "bookingId", "Required"))?;

    state
        .bookings()
        .notify_booking(state.notifier(), booking_id, input.kind, input.payment_type)
        .await?;

    Ok(Json(json!({ "message": "Notifications sent successfully" })))
}
