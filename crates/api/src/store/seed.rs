//! Startup data: the default catalog and a pre-verified demo account.

use chrono::Utc;

use skybook_core::{Email, Price};

use super::EntityStore;
use crate::models::{NewService, User};

/// Email of the seeded demo account.
pub const DEMO_USER_EMAIL: &str = "demo@skybook.pro";

/// name, description, price per hour (cents), icon, color
const CATALOG: [(&str, &str, i64, &str, &str); 6] = [
    (
        "Videography",
        "Professional aerial videos",
        15_000,
        "fas fa-video",
        "from-red-500 to-pink-500",
    ),
    (
        "Photography",
        "High-resolution aerial photos",
        12_000,
        "fas fa-camera",
        "from-blue-500 to-cyan-500",
    ),
    (
        "Agriculture",
        "Crop monitoring & analysis",
        20_000,
        "fas fa-seedling",
        "from-green-500 to-emerald-500",
    ),
    (
        "Surveillance",
        "Security & monitoring",
        18_000,
        "fas fa-eye",
        "from-purple-500 to-indigo-500",
    ),
    (
        "Inspection",
        "Infrastructure & building inspection",
        16_000,
        "fas fa-search",
        "from-orange-500 to-red-500",
    ),
    (
        "Custom Service",
        "Specialized requirements",
        0,
        "fas fa-cogs",
        "from-yellow-500 to-amber-500",
    ),
];

/// The six services every fresh catalog starts with.
#[must_use]
pub fn default_services() -> Vec<NewService> {
    CATALOG
        .iter()
        .map(|&(name, description, cents, icon, color)| NewService {
            name: name.to_owned(),
            description: description.to_owned(),
            price_per_hour: Price::from_cents(cents),
            icon: icon.to_owned(),
            color: color.to_owned(),
            is_active: true,
        })
        .collect()
}

pub(super) async fn seed(store: &EntityStore) {
    let services = store.services();
    for service in default_services() {
        services.create(service).await;
    }

    match Email::parse(DEMO_USER_EMAIL) {
        Ok(email) => {
            store
                .users
                .insert_with(|id| User {
                    id,
                    full_name: "Demo User".to_owned(),
                    email,
                    phone: "+1234567890".to_owned(),
                    is_verified: true,
                    otp: None,
                    otp_expires: None,
                    created_at: Utc::now(),
                })
                .await;
        }
        Err(e) => tracing::warn!(error = %e, "Skipping demo user"),
    }

    tracing::info!(
        services = store.services.count().await,
        users = store.users.count().await,
        "Seeded demo data"
    );
}
