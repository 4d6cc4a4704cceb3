//! Business logic services.
//!
//! # Services
//!
//! - `admin_auth` - Admin credential check
//! - `booking` - Booking creation, listings, updates, bills, notifications
//! - `email` - Notifier trait with SMTP and log-only implementations
//! - `payment` - Payment intents (simulated provider)
//! - `stats` - Admin dashboard aggregates
//! - `verification` - Registration and one-time-code email verification

pub mod admin_auth;
pub mod booking;
pub mod email;
pub mod payment;
pub mod stats;
pub mod verification;

#[cfg(test)]
pub(crate) mod testing;

pub use admin_auth::{AdminAuthError, AdminLoginInput, AdminProfile};
pub use booking::{BookingError, BookingService};
pub use email::{LogNotifier, NotificationError, Notifier, SmtpNotifier};
pub use payment::{
    PaymentError, PaymentIntent, PaymentIntentInput, PaymentProvider, SimulatedPaymentProvider,
};
pub use stats::AdminStats;
pub use verification::{VerificationError, VerificationService};
