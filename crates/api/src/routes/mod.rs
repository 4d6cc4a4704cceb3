//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness check
//!
//! # Registration
//! POST   /api/register                    - Create user, email a code
//! POST   /api/verify-otp                  - Confirm the emailed code
//! POST   /api/resend-otp                  - Issue a fresh code
//! GET    /api/user/{id}                   - Public user profile
//!
//! # Catalog
//! GET    /api/services                    - Active services
//! GET    /api/services/{id}               - Any service by id
//!
//! # Bookings
//! POST   /api/bookings                    - Create booking
//! GET    /api/bookings/user/{user_id}     - A user's bookings with service details
//! GET    /api/bookings/{id}/bill          - Cost breakdown
//! PATCH  /api/bookings/{id}               - Partial update
//! POST   /api/create-payment-intent       - Payment intent (simulated)
//! POST   /api/send-booking-notification   - Email + SMS to the customer
//!
//! # Admin
//! POST   /api/admin/login                 - Credential check
//! POST   /api/admin/services              - Create service
//! PUT    /api/admin/services/{id}         - Update service
//! DELETE /api/admin/services/{id}         - Delete service
//! GET    /api/admin/bookings              - All bookings with user and service
//! GET    /api/admin/stats                 - Dashboard figures
//! ```

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod payments;
pub mod services;
pub mod users;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

/// Customer-facing API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/verify-otp", post(auth::verify_otp))
        .route("/resend-otp", post(auth::resend_otp))
        .route("/user/{id}", get(users::get_user))
        .route("/services", get(services::list_services))
        .route("/services/{id}", get(services::get_service))
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/user/{user_id}", get(bookings::user_bookings))
        .route("/bookings/{id}/bill", get(bookings::booking_bill))
        .route("/bookings/{id}", patch(bookings::update_booking))
        .route("/create-payment-intent", post(payments::create_payment_intent))
        .route("/send-booking-notification", post(bookings::send_notification))
}

/// Admin dashboard routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/services", post(admin::create_service))
        .route(
            "/services/{id}",
            put(admin::update_service).delete(admin::delete_service),
        )
        .route("/bookings", get(admin::list_bookings))
        .route("/stats", get(admin::get_stats))
}

/// All application routes.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api", api_routes().nest("/admin", admin_routes()))
}
