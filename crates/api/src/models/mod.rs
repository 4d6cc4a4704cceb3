//! Domain models for the booking API.
//!
//! Each entity has a stored form, a "new" form used by the store when
//! inserting, request-body inputs that validate into those, and the response
//! views the routes serialize.

mod booking;
mod service;
mod user;

use serde::{Deserialize, Deserializer};

pub use booking::{
    AdminBooking, Booking, BookingInput, BookingPatch, BookingPatchInput, CostBreakdown,
    NewBooking, UserBooking,
};
pub use service::{NewService, Service, ServiceInput, ServiceName, ServicePatch, ServiceSummary};
pub use user::{
    CodeRejected, NewUser, PublicUser, RegisterInput, User, UserPatch, UserSummary,
    VerificationState, VerifiedUser,
};

/// Deserialize a nullable patch field so that an explicit `null` becomes
/// `Some(None)` while an absent field (with `#[serde(default)]`) stays `None`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
