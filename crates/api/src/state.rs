//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::services::{BookingService, Notifier, PaymentProvider, VerificationService};
use crate::store::EntityStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// entity store, configuration and the outbound collaborators.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    store: EntityStore,
    notifier: Arc<dyn Notifier>,
    payments: Arc<dyn PaymentProvider>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: ApiConfig,
        store: EntityStore,
        notifier: Arc<dyn Notifier>,
        payments: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                notifier,
                payments,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the entity store.
    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.inner.store
    }

    /// Get a reference to the notifier.
    #[must_use]
    pub fn notifier(&self) -> &dyn Notifier {
        self.inner.notifier.as_ref()
    }

    /// Get a reference to the payment provider.
    #[must_use]
    pub fn payments(&self) -> &dyn PaymentProvider {
        self.inner.payments.as_ref()
    }

    /// Registration and verification service over this state.
    #[must_use]
    pub fn verification(&self) -> VerificationService<'_> {
        VerificationService::new(
            self.store().users(),
            self.notifier(),
            self.config().booking.otp_ttl,
        )
    }

    /// Booking service over this state.
    #[must_use]
    pub fn bookings(&self) -> BookingService<'_> {
        BookingService::new(self.store(), &self.config().booking)
    }
}
