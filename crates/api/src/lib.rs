//! SkyBook booking API library.
//!
//! This crate provides the booking backend as a library, allowing it to be
//! tested end to end and embedded by the binary in `main.rs`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;

use std::sync::Arc;

use axum::{Router, http::Request, routing::get};
use tower_http::trace::TraceLayer;

use config::ApiConfig;
use services::{LogNotifier, Notifier, SimulatedPaymentProvider, SmtpNotifier};
use state::AppState;
use store::EntityStore;

/// Build the full application router with middleware.
pub fn router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = tracing::field::Empty,
        )
    });

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(trace_layer)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Build application state from configuration: seed the store if enabled
/// and pick the notifier (SMTP when configured, otherwise log-only).
///
/// # Errors
///
/// Returns an error if the SMTP transport cannot be built.
pub async fn build_state(
    config: ApiConfig,
) -> Result<AppState, lettre::transport::smtp::Error> {
    let store = if config.seed_demo_data {
        EntityStore::seeded().await
    } else {
        EntityStore::new()
    };

    let notifier: Arc<dyn Notifier> = match &config.email {
        Some(email) => {
            let ttl_minutes = config.booking.otp_ttl.num_minutes();
            tracing::info!(smtp_host = %email.smtp_host, "Email delivery via SMTP");
            Arc::new(SmtpNotifier::new(email, ttl_minutes)?)
        }
        None => {
            tracing::warn!("SMTP not configured; notifications are only logged");
            Arc::new(LogNotifier)
        }
    };

    if config.admin.uses_default_password {
        tracing::warn!("SKYBOOK_ADMIN_PASSWORD not set; using the default admin password");
    }

    Ok(AppState::new(
        config,
        store,
        notifier,
        Arc::new(SimulatedPaymentProvider),
    ))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
