//! In-memory entity store.
//!
//! # Tables
//!
//! - `users` - Customers and their verification state
//! - `services` - The drone-service catalog
//! - `bookings` - Service bookings made by users
//!
//! Each table assigns its own sequential ids starting at 1. Ids are never
//! reused, even after a service is deleted. Nothing survives a restart; the
//! catalog and the demo account are re-seeded at startup when enabled.

mod bookings;
mod seed;
mod services;
mod table;
mod users;

use thiserror::Error;

use skybook_core::{BookingId, ServiceId, UserId};

pub use bookings::BookingRepository;
pub use seed::{DEMO_USER_EMAIL, default_services};
pub use services::ServiceRepository;
pub use table::{Table, TableKey};
pub use users::UserRepository;

use crate::models::{Booking, Service, User};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Owner of every entity table.
#[derive(Default)]
pub struct EntityStore {
    users: Table<UserId, User>,
    services: Table<ServiceId, Service>,
    bookings: Table<BookingId, Booking>,
}

impl EntityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the default catalog and the demo user.
    pub async fn seeded() -> Self {
        let store = Self::new();
        seed::seed(&store).await;
        store
    }

    #[must_use]
    pub const fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.users)
    }

    #[must_use]
    pub const fn services(&self) -> ServiceRepository<'_> {
        ServiceRepository::new(&self.services)
    }

    #[must_use]
    pub const fn bookings(&self) -> BookingRepository<'_> {
        BookingRepository::new(&self.bookings)
    }
}
