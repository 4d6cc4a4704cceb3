//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as JSON:
//!
//! ```json
//! { "message": "Invalid booking data",
//!   "errors": [{ "field": "duration", "message": "Duration must be at least 1 hour" }] }
//! ```
//!
//! `errors` is present only for validation failures. Server errors are
//! captured to Sentry before responding, and their details are not exposed.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::{
    AdminAuthError, BookingError, PaymentError, VerificationError, email::NotificationError,
};
use crate::validation::{FieldError, ValidationErrors};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body or parameters failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Request was well-formed but a referenced entity or state rules it out.
    #[error("{0}")]
    PreconditionFailed(String),

    /// Credentials rejected.
    #[error("{0}")]
    Unauthorized(String),

    /// Email or SMS delivery failed.
    #[error("{message}: {source}")]
    NotificationFailed {
        message: &'static str,
        source: NotificationError,
    },

    /// Payment provider failed.
    #[error("Payment initialization failed: {0}")]
    PaymentFailed(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::PreconditionFailed(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotificationFailed { .. } | Self::PaymentFailed(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let (message, errors) = match &self {
            Self::Validation(v) => (v.message(), v.errors()),
            Self::NotFound(m) | Self::PreconditionFailed(m) | Self::Unauthorized(m) => {
                (m.as_str(), &[][..])
            }
            Self::NotificationFailed { message, .. } => (*message, &[][..]),
            Self::PaymentFailed(_) => ("Payment initialization failed", &[][..]),
            Self::Internal(_) => ("Internal server error", &[][..]),
        };

        let body = ErrorBody {
            message,
            errors: (!errors.is_empty()).then_some(errors),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(ValidationErrors::single(
            "Invalid request body",
            "body",
            rejection.body_text(),
        ))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(ValidationErrors::single(
            "Invalid path parameter",
            "path",
            rejection.body_text(),
        ))
    }
}

impl From<VerificationError> for AppError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::Validation(v) => Self::Validation(v),
            VerificationError::UserNotFound => Self::NotFound(err.to_string()),
            VerificationError::EmailTaken
            | VerificationError::InvalidCode
            | VerificationError::CodeExpired => Self::PreconditionFailed(err.to_string()),
            VerificationError::NotificationFailed(source) => Self::NotificationFailed {
                message: "Failed to send verification email",
                source,
            },
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(v) => Self::Validation(v),
            BookingError::UserNotVerified | BookingError::ServiceNotFound => {
                Self::PreconditionFailed(err.to_string())
            }
            BookingError::NotFound | BookingError::RecipientNotFound => {
                Self::NotFound(err.to_string())
            }
            BookingError::NotificationFailed(source) => Self::NotificationFailed {
                message: "Failed to send notifications",
                source,
            },
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Validation(v) => Self::Validation(v),
            PaymentError::Provider(msg) => Self::PaymentFailed(msg),
        }
    }
}

impl From<AdminAuthError> for AppError {
    fn from(err: AdminAuthError) -> Self {
        Self::Unauthorized(err.to_string())
    }
}

/// JSON body extractor whose rejections render as [`AppError`].
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl<T: Serialize> IntoResponse for ApiJson<T> {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

/// Path extractor whose rejections render as [`AppError`].
#[derive(Debug, Clone, Copy, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
