//! Booking lifecycle: creation, listing, updates, bills and notifications.

use std::collections::HashMap;

use thiserror::Error;
use tracing::instrument;

use skybook_core::{BookingId, NotificationKind, PaymentType, ServiceId, UserId};

use super::email::{BookingNotice, NotificationError, Notifier};
use crate::config::BookingConfig;
use crate::models::{
    AdminBooking, Booking, BookingInput, BookingPatchInput, CostBreakdown, Service, ServiceName,
    ServiceSummary, UserBooking, UserSummary,
};
use crate::store::EntityStore;
use crate::validation::ValidationErrors;

/// Errors that can occur during booking operations.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The booking user is missing or has not verified their email.
    #[error("User not found or not verified")]
    UserNotVerified,

    /// The booked service does not exist.
    #[error("Service not found")]
    ServiceNotFound,

    /// No booking with the given id.
    #[error("Booking not found")]
    NotFound,

    /// The booking's user or service no longer exists.
    #[error("User or service not found")]
    RecipientNotFound,

    /// A notification could not be delivered.
    #[error("Failed to send notifications: {0}")]
    NotificationFailed(#[from] NotificationError),
}

/// Booking domain service.
pub struct BookingService<'a> {
    store: &'a EntityStore,
    config: &'a BookingConfig,
}

impl<'a> BookingService<'a> {
    /// Create a new booking service.
    #[must_use]
    pub const fn new(store: &'a EntityStore, config: &'a BookingConfig) -> Self {
        Self { store, config }
    }

    /// Validate and store a booking for a verified user.
    ///
    /// Inactive services can still be booked by id. The client-computed
    /// total is stored as given.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Validation` listing every bad field,
    /// `BookingError::UserNotVerified` or `BookingError::ServiceNotFound`
    /// when a referenced entity fails its precondition.
    #[instrument(skip(self, input))]
    pub async fn create_booking(&self, input: BookingInput) -> Result<Booking, BookingError> {
        let new = input.validate()?;

        let user = self.store.users().get_by_id(new.user_id).await;
        if !user.is_some_and(|u| u.is_verified) {
            return Err(BookingError::UserNotVerified);
        }
        if self.store.services().get_by_id(new.service_id).await.is_none() {
            return Err(BookingError::ServiceNotFound);
        }

        let booking = self.store.bookings().create(new).await;
        tracing::info!(
            booking_id = %booking.id,
            user_id = %booking.user_id,
            service_id = %booking.service_id,
            "Booking created"
        );
        Ok(booking)
    }

    /// A user's bookings with the details of each booked service.
    /// An unknown user simply has no bookings.
    pub async fn user_bookings(&self, user_id: UserId) -> Vec<UserBooking> {
        let bookings = self.store.bookings().list_for_user(user_id).await;
        let services = self.services_by_id().await;

        bookings
            .into_iter()
            .map(|booking| {
                let service = services.get(&booking.service_id).map(ServiceSummary::from);
                UserBooking { booking, service }
            })
            .collect()
    }

    /// Every booking with its customer and service name, for admins.
    pub async fn all_bookings_enriched(&self) -> Vec<AdminBooking> {
        let bookings = self.store.bookings().list_all().await;
        let services = self.services_by_id().await;
        let users: HashMap<_, _> = self
            .store
            .users()
            .list_all()
            .await
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        bookings
            .into_iter()
            .map(|booking| AdminBooking {
                user: users.get(&booking.user_id).map(UserSummary::from),
                service: services.get(&booking.service_id).map(ServiceName::from),
                booking,
            })
            .collect()
    }

    /// Apply a partial update (payment completion, admin edits).
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Validation` for bad fields and
    /// `BookingError::NotFound` if the booking does not exist.
    #[instrument(skip(self, patch), fields(booking_id = %id))]
    pub async fn update_booking(
        &self,
        id: BookingId,
        patch: BookingPatchInput,
    ) -> Result<Booking, BookingError> {
        let patch = patch.validate()?;
        let booking = self
            .store
            .bookings()
            .update(id, patch)
            .await
            .map_err(|_| BookingError::NotFound)?;

        tracing::info!(status = %booking.status, "Booking updated");
        Ok(booking)
    }

    /// The bill for a booking: total, advance share and balance.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::NotFound` if the booking does not exist.
    pub async fn cost_breakdown(&self, id: BookingId) -> Result<CostBreakdown, BookingError> {
        let booking = self
            .store
            .bookings()
            .get_by_id(id)
            .await
            .ok_or(BookingError::NotFound)?;
        let service = self.store.services().get_by_id(booking.service_id).await;

        Ok(CostBreakdown::new(
            &booking,
            service.as_ref(),
            self.config.advance_percent,
            self.config.currency,
        ))
    }

    /// Email a booking summary to the customer and text them the amount
    /// received: the full total, or the advance share for advance payments.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::NotFound` if the booking does not exist,
    /// `BookingError::RecipientNotFound` if its user or service is gone, and
    /// `BookingError::NotificationFailed` if either delivery fails.
    #[instrument(skip(self, notifier), fields(booking_id = %id))]
    pub async fn notify_booking(
        &self,
        notifier: &dyn Notifier,
        id: BookingId,
        kind: NotificationKind,
        payment_type: PaymentType,
    ) -> Result<(), BookingError> {
        let booking = self
            .store
            .bookings()
            .get_by_id(id)
            .await
            .ok_or(BookingError::NotFound)?;
        let user = self.store.users().get_by_id(booking.user_id).await;
        let service = self.store.services().get_by_id(booking.service_id).await;
        let (Some(user), Some(service)) = (user, service) else {
            return Err(BookingError::RecipientNotFound);
        };

        let currency = self.config.currency;
        let notice = BookingNotice {
            kind,
            customer_name: user.full_name.clone(),
            service_name: service.name.clone(),
            date: booking.date.clone(),
            time: booking.time.clone(),
            duration: booking.duration,
            location: booking.location.clone(),
            total: currency.format(booking.total_cost),
            payment_line: self.payment_line(payment_type),
        };
        notifier.send_booking_update(&user.email, &notice).await?;

        let paid = match payment_type {
            PaymentType::Full => booking.total_cost,
            PaymentType::Advance => booking.total_cost.percent(self.config.advance_percent),
        };
        let sms = format!(
            "SkyBook Pro: Your {} booking for {} at {} is confirmed. Payment: {} received.",
            service.name,
            booking.date,
            booking.time,
            currency.format(paid)
        );
        notifier.send_sms(&user.phone, &sms).await?;

        tracing::info!("Booking notifications sent");
        Ok(())
    }

    fn payment_line(&self, payment_type: PaymentType) -> String {
        match payment_type {
            PaymentType::Full => "Full payment completed".to_owned(),
            PaymentType::Advance => format!("{}% advance paid", self.config.advance_percent),
        }
    }

    async fn services_by_id(&self) -> HashMap<ServiceId, Service> {
        self.store
            .services()
            .list_all()
            .await
            .into_iter()
            .map(|s| (s.id, s))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use skybook_core::{BookingStatus, PaymentStatus};

    use super::*;
    use crate::services::testing::{FailingNotifier, RecordingNotifier};

    fn booking_input(user: i32, service: i32) -> BookingInput {
        serde_json::from_value(json!({
            "userId": user,
            "serviceId": service,
            "location": "Baner, Pune",
            "date": "2026-11-02",
            "time": "09:00",
            "duration": 2,
            "totalCost": "300.00"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_for_verified_user() {
        let store = EntityStore::seeded().await;
        let config = BookingConfig::default();
        let service = BookingService::new(&store, &config);

        let booking = service.create_booking(booking_input(1, 1)).await.unwrap();
        assert_eq!(booking.id, BookingId::new(1));
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.total_cost.to_string(), "300.00");
    }

    #[tokio::test]
    async fn test_create_rejects_unverified_user() {
        let store = EntityStore::seeded().await;
        let user = store
            .users()
            .create(crate::models::NewUser {
                full_name: "Asha Rao".to_owned(),
                email: skybook_core::Email::parse("a@x.com").unwrap(),
                phone: "+919800000000".to_owned(),
            })
            .await
            .unwrap();
        let config = BookingConfig::default();
        let service = BookingService::new(&store, &config);

        let err = service
            .create_booking(booking_input(user.id.as_i32(), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::UserNotVerified));

        let err = service
            .create_booking(booking_input(42, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::UserNotVerified));
        assert_eq!(store.bookings().count().await, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_service() {
        let store = EntityStore::seeded().await;
        let config = BookingConfig::default();
        let service = BookingService::new(&store, &config);

        let err = service
            .create_booking(booking_input(1, 99))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::ServiceNotFound));
    }

    #[tokio::test]
    async fn test_create_allows_inactive_service() {
        let store = EntityStore::seeded().await;
        store
            .services()
            .update(
                ServiceId::new(2),
                crate::models::ServicePatch {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let config = BookingConfig::default();
        let service = BookingService::new(&store, &config);

        assert!(service.create_booking(booking_input(1, 2)).await.is_ok());
    }

    #[tokio::test]
    async fn test_user_bookings_survive_service_deletion() {
        let store = EntityStore::seeded().await;
        let config = BookingConfig::default();
        let service = BookingService::new(&store, &config);
        service.create_booking(booking_input(1, 1)).await.unwrap();
        service.create_booking(booking_input(1, 3)).await.unwrap();
        store.services().delete(ServiceId::new(3)).await.unwrap();

        let bookings = service.user_bookings(UserId::new(1)).await;
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].service.as_ref().unwrap().name, "Videography");
        assert!(bookings[1].service.is_none());

        assert!(service.user_bookings(UserId::new(7)).await.is_empty());
    }

    #[tokio::test]
    async fn test_admin_listing_is_enriched() {
        let store = EntityStore::seeded().await;
        let config = BookingConfig::default();
        let service = BookingService::new(&store, &config);
        service.create_booking(booking_input(1, 2)).await.unwrap();

        let all = service.all_bookings_enriched().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].user.as_ref().unwrap().full_name, "Demo User");
        assert_eq!(all[0].service.as_ref().unwrap().name, "Photography");
    }

    #[tokio::test]
    async fn test_update_booking() {
        let store = EntityStore::seeded().await;
        let config = BookingConfig::default();
        let service = BookingService::new(&store, &config);
        let booking = service.create_booking(booking_input(1, 1)).await.unwrap();

        let patch: BookingPatchInput = serde_json::from_value(json!({
            "status": "advance_paid",
            "paymentStatus": "paid",
            "paymentType": "advance"
        }))
        .unwrap();
        let updated = service.update_booking(booking.id, patch).await.unwrap();
        assert_eq!(updated.status, BookingStatus::AdvancePaid);
        assert_eq!(updated.payment_status, Some(PaymentStatus::Paid));
        assert_eq!(updated.payment_type, Some(PaymentType::Advance));

        let err = service
            .update_booking(BookingId::new(99), BookingPatchInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::NotFound));
    }

    #[tokio::test]
    async fn test_cost_breakdown() {
        let store = EntityStore::seeded().await;
        let config = BookingConfig::default();
        let service = BookingService::new(&store, &config);
        let booking = service.create_booking(booking_input(1, 1)).await.unwrap();

        let bill = service.cost_breakdown(booking.id).await.unwrap();
        assert_eq!(bill.total.to_string(), "300.00");
        assert_eq!(bill.advance_amount.to_string(), "90.00");
        assert_eq!(bill.balance_after_advance.to_string(), "210.00");
        assert_eq!(bill.rate_per_hour.unwrap().to_string(), "150.00");
    }

    #[tokio::test]
    async fn test_notify_advance_payment() {
        let store = EntityStore::seeded().await;
        let config = BookingConfig::default();
        let service = BookingService::new(&store, &config);
        let booking = service.create_booking(booking_input(1, 1)).await.unwrap();
        let notifier = RecordingNotifier::default();

        service
            .notify_booking(
                &notifier,
                booking.id,
                NotificationKind::Confirmation,
                PaymentType::Advance,
            )
            .await
            .unwrap();

        let notices = notifier.booking_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].0, "demo@skybook.pro");
        assert_eq!(notices[0].1.payment_line, "30% advance paid");
        assert_eq!(notices[0].1.total, "₹300.00");

        let sms = notifier.sms_sent();
        assert_eq!(sms[0].0, "+1234567890");
        assert!(sms[0].1.contains("₹90.00"));
    }

    #[tokio::test]
    async fn test_notify_full_payment_and_failures() {
        let store = EntityStore::seeded().await;
        let config = BookingConfig::default();
        let service = BookingService::new(&store, &config);
        let booking = service.create_booking(booking_input(1, 1)).await.unwrap();

        let notifier = RecordingNotifier::default();
        service
            .notify_booking(&notifier, booking.id, NotificationKind::Update, PaymentType::Full)
            .await
            .unwrap();
        assert!(notifier.sms_sent()[0].1.contains("₹300.00"));

        let err = service
            .notify_booking(
                &FailingNotifier,
                booking.id,
                NotificationKind::Update,
                PaymentType::Full,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::NotificationFailed(_)));

        let err = service
            .notify_booking(
                &notifier,
                BookingId::new(50),
                NotificationKind::Update,
                PaymentType::Full,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::NotFound));

        store.services().delete(ServiceId::new(1)).await.unwrap();
        let err = service
            .notify_booking(&notifier, booking.id, NotificationKind::Update, PaymentType::Full)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::RecipientNotFound));
    }
}
