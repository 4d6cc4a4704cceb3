//! Booking repository.

use chrono::Utc;

use skybook_core::{BookingId, BookingStatus, UserId};

use super::{RepositoryError, Table};
use crate::models::{Booking, BookingPatch, NewBooking};

/// Repository for booking records.
pub struct BookingRepository<'a> {
    table: &'a Table<BookingId, Booking>,
}

impl<'a> BookingRepository<'a> {
    /// Create a new booking repository.
    #[must_use]
    pub const fn new(table: &'a Table<BookingId, Booking>) -> Self {
        Self { table }
    }

    /// Every booking in id order.
    pub async fn list_all(&self) -> Vec<Booking> {
        self.table.list().await
    }

    /// Get a booking by ID.
    pub async fn get_by_id(&self, id: BookingId) -> Option<Booking> {
        self.table.get(id).await
    }

    /// Bookings made by one user.
    pub async fn list_for_user(&self, user_id: UserId) -> Vec<Booking> {
        self.table
            .filter(|booking| booking.user_id == user_id)
            .await
    }

    /// Store a new booking. It starts `confirmed` with no payment recorded.
    pub async fn create(&self, new: NewBooking) -> Booking {
        self.table
            .insert_with(|id| Booking {
                id,
                user_id: new.user_id,
                service_id: new.service_id,
                location: new.location,
                date: new.date,
                time: new.time,
                duration: new.duration,
                total_cost: new.total_cost,
                requirements: new.requirements,
                status: BookingStatus::Confirmed,
                payment_status: None,
                payment_type: None,
                created_at: Utc::now(),
            })
            .await
    }

    /// Merge `patch` into the booking.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the booking does not exist.
    pub async fn update(
        &self,
        id: BookingId,
        patch: BookingPatch,
    ) -> Result<Booking, RepositoryError> {
        self.table
            .update(id, |booking| patch.apply(booking))
            .await
            .ok_or(RepositoryError::NotFound)
    }

    /// Number of bookings.
    pub async fn count(&self) -> usize {
        self.table.count().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use skybook_core::{PaymentStatus, ServiceId};

    use super::*;

    fn new_booking(user: i32) -> NewBooking {
        NewBooking {
            user_id: UserId::new(user),
            service_id: ServiceId::new(1),
            location: "Baner, Pune".to_owned(),
            date: "2026-11-02".to_owned(),
            time: "09:00".to_owned(),
            duration: 2,
            total_cost: "300.00".parse().unwrap(),
            requirements: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let table = Table::new();
        let repo = BookingRepository::new(&table);
        let booking = repo.create(new_booking(1)).await;

        assert_eq!(booking.id, BookingId::new(1));
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, None);
        assert_eq!(booking.requirements, None);
    }

    #[tokio::test]
    async fn test_list_for_user() {
        let table = Table::new();
        let repo = BookingRepository::new(&table);
        repo.create(new_booking(1)).await;
        repo.create(new_booking(2)).await;
        repo.create(new_booking(1)).await;

        let mine = repo.list_for_user(UserId::new(1)).await;
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|b| b.user_id == UserId::new(1)));
        assert!(repo.list_for_user(UserId::new(3)).await.is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let table = Table::new();
        let repo = BookingRepository::new(&table);
        let booking = repo.create(new_booking(1)).await;

        let patch = BookingPatch {
            status: Some(BookingStatus::Completed),
            payment_status: Some(Some(PaymentStatus::Paid)),
            ..BookingPatch::default()
        };
        let updated = repo.update(booking.id, patch).await.unwrap();

        assert_eq!(updated.status, BookingStatus::Completed);
        assert_eq!(updated.payment_status, Some(PaymentStatus::Paid));
        assert_eq!(updated.location, booking.location);
        assert_eq!(updated.created_at, booking.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_booking() {
        let table = Table::new();
        let repo = BookingRepository::new(&table);
        let err = repo
            .update(BookingId::new(42), BookingPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
