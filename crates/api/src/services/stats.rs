//! Admin dashboard figures.

use serde::Serialize;

use skybook_core::Price;

use crate::store::EntityStore;

/// Placeholder growth figure shown on the dashboard until real
/// period-over-period tracking exists.
pub const GROWTH_PLACEHOLDER: &str = "+24%";

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: usize,
    pub total_bookings: usize,
    /// Sum of every booking total, e.g. `"1250.00"`.
    pub revenue: Price,
    pub growth: &'static str,
}

/// Count users and bookings and total up revenue.
pub async fn compute_stats(store: &EntityStore) -> AdminStats {
    let bookings = store.bookings().list_all().await;

    AdminStats {
        total_users: store.users().count().await,
        total_bookings: bookings.len(),
        revenue: bookings.iter().map(|b| b.total_cost).sum(),
        growth: GROWTH_PLACEHOLDER,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use skybook_core::{Email, ServiceId, UserId};

    use super::*;
    use crate::models::{NewBooking, NewUser};

    fn booking(total: &str) -> NewBooking {
        NewBooking {
            user_id: UserId::new(1),
            service_id: ServiceId::new(1),
            location: "Baner, Pune".to_owned(),
            date: "2026-11-02".to_owned(),
            time: "09:00".to_owned(),
            duration: 1,
            total_cost: total.parse().unwrap(),
            requirements: None,
        }
    }

    #[tokio::test]
    async fn test_empty_store() {
        let stats = compute_stats(&EntityStore::new()).await;
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.total_bookings, 0);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["revenue"], "0.00");
        assert_eq!(json["growth"], "+24%");
    }

    #[tokio::test]
    async fn test_revenue_sums_totals() {
        let store = EntityStore::new();
        for email in ["a@x.com", "b@x.com"] {
            store
                .users()
                .create(NewUser {
                    full_name: "Someone".to_owned(),
                    email: Email::parse(email).unwrap(),
                    phone: "1".to_owned(),
                })
                .await
                .unwrap();
        }
        store.bookings().create(booking("150")).await;
        store.bookings().create(booking("99.5")).await;

        let stats = compute_stats(&store).await;
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_bookings, 2);
        assert_eq!(stats.revenue.to_string(), "249.50");
        assert_eq!(
            serde_json::to_value(&stats).unwrap()["totalBookings"],
            2
        );
    }

    #[tokio::test]
    async fn test_revenue_saturates_instead_of_overflowing() {
        let store = EntityStore::new();
        for _ in 0..3 {
            store
                .bookings()
                .create(booking("50000000000000000000000000000"))
                .await;
        }

        let stats = compute_stats(&store).await;
        assert_eq!(stats.total_bookings, 3);
        assert!(stats.revenue.exceeds_max());
    }
}
