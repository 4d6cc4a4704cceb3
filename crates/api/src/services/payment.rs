//! Payment intents.
//!
//! No money moves here. The checkout page asks for an intent, gets back a
//! client secret and the amount in minor units, and then records the
//! outcome on the booking itself through the booking update route.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use skybook_core::{BookingId, CurrencyCode, PaymentType, Price};

use crate::validation::ValidationErrors;

/// Errors that can occur when creating a payment intent.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Request failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The provider could not create the intent.
    #[error("payment provider error: {0}")]
    Provider(String),
}

/// Payment intent request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentInput {
    pub amount: Option<Price>,
    pub booking_id: Option<BookingId>,
    pub payment_type: Option<PaymentType>,
    pub currency: Option<CurrencyCode>,
}

impl PaymentIntentInput {
    /// Validate into a [`PaymentIntentRequest`], filling in the default
    /// currency when none was sent.
    ///
    /// # Errors
    ///
    /// Returns every violated field.
    pub fn validate(
        self,
        default_currency: CurrencyCode,
    ) -> Result<PaymentIntentRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new("Invalid payment data");

        let amount = errors.required("amount", self.amount);
        errors.amount_in_range("amount", "Amount", amount);
        // In range, so always representable in minor units.
        let minor_units = amount.and_then(|amount| amount.to_minor_units());

        errors.finish(|| {
            Some(PaymentIntentRequest {
                amount_minor: minor_units?,
                currency: self.currency.unwrap_or(default_currency),
                payment_type: self.payment_type,
                booking_id: self.booking_id,
            })
        })
    }
}

/// A validated request for a payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
    /// Amount in minor units (paise, cents).
    pub amount_minor: i64,
    pub currency: CurrencyCode,
    pub payment_type: Option<PaymentType>,
    pub booking_id: Option<BookingId>,
}

/// What the checkout page needs to confirm a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub client_secret: String,
    /// Amount in minor units.
    pub amount: i64,
    pub currency: CurrencyCode,
    pub payment_type: Option<PaymentType>,
    pub booking_id: Option<BookingId>,
}

/// Creates payment intents.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create an intent for `request`.
    async fn create_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;
}

/// Provider that fabricates intents locally.
///
/// Client secrets look like `pi_<unix millis>_secret_<9 lowercase
/// alphanumerics>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedPaymentProvider;

#[async_trait]
impl PaymentProvider for SimulatedPaymentProvider {
    async fn create_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        let client_secret = format!("pi_{}_secret_{suffix}", Utc::now().timestamp_millis());

        tracing::info!(
            amount = request.amount_minor,
            currency = %request.currency,
            booking_id = ?request.booking_id,
            "Payment intent created"
        );

        Ok(PaymentIntent {
            client_secret,
            amount: request.amount_minor,
            currency: request.currency,
            payment_type: request.payment_type,
            booking_id: request.booking_id,
        })
    }
}
