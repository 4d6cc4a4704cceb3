//! Payment intent handler.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{ApiJson, Result};
use crate::services::{PaymentIntent, PaymentIntentInput};
use crate::state::AppState;

/// `POST /api/create-payment-intent`
///
/// The amount is taken as sent; the checkout page computes it from the bill.
#[instrument(skip(state, input))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<PaymentIntentInput>,
) -> Result<Json<PaymentIntent>> {
    let request = input.validate(state.config().booking.currency)?;
    let intent = state.payments().create_intent(request).await?;
    Ok(Json(intent))
}
