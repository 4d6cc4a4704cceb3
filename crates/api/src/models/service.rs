//! Service catalog types.
//!
//! A service is a bookable drone-service category (videography,
//! agriculture, inspection, ...) with an hourly rate.

use serde::{Deserialize, Serialize};

use skybook_core::{Price, ServiceId};

use crate::validation::ValidationErrors;

/// A service category in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub price_per_hour: Price,
    /// Icon reference used by the client (e.g. `fas fa-video`).
    pub icon: String,
    /// Color/style reference used by the client.
    pub color: String,
    /// Inactive services are hidden from the public listing.
    pub is_active: bool,
}

/// Fields for creating a service.
#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub price_per_hour: Price,
    pub icon: String,
    pub color: String,
    pub is_active: bool,
}

/// Service creation request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_per_hour: Option<Price>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}

impl ServiceInput {
    /// Validate into a [`NewService`]; `isActive` defaults to true.
    ///
    /// # Errors
    ///
    /// Returns every violated field.
    pub fn validate(self) -> Result<NewService, ValidationErrors> {
        let mut errors = ValidationErrors::new("Invalid service data");

        let name = errors.non_empty("name", "Name", self.name);
        let description = errors.required("description", self.description);
        let icon = errors.required("icon", self.icon);
        let color = errors.required("color", self.color);
        let price_per_hour = errors.required("pricePerHour", self.price_per_hour);
        errors.amount_in_range("pricePerHour", "Price", price_per_hour);

        errors.finish(|| {
            Some(NewService {
                name: name?,
                description: description?,
                price_per_hour: price_per_hour?,
                icon: icon?,
                color: color?,
                is_active: self.is_active.unwrap_or(true),
            })
        })
    }
}

/// Partial update for a service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_per_hour: Option<Price>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}

impl ServicePatch {
    /// Check the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns every violated field.
    pub fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new("Invalid service data");
        errors.non_empty_if_present("name", "Name", self.name.as_ref());
        errors.amount_in_range("pricePerHour", "Price", self.price_per_hour);
        errors.finish(|| Some(self))
    }

    /// Shallow-merge into `service`.
    pub fn apply(self, service: &mut Service) {
        if let Some(name) = self.name {
            service.name = name;
        }
        if let Some(description) = self.description {
            service.description = description;
        }
        if let Some(price_per_hour) = self.price_per_hour {
            service.price_per_hour = price_per_hour;
        }
        if let Some(icon) = self.icon {
            service.icon = icon;
        }
        if let Some(color) = self.color {
            service.color = color;
        }
        if let Some(is_active) = self.is_active {
            service.is_active = is_active;
        }
    }
}

/// Service details nested into a user's booking list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
}

impl From<&Service> for ServiceSummary {
    fn from(service: &Service) -> Self {
        Self {
            name: service.name.clone(),
            description: service.description.clone(),
            icon: service.icon.clone(),
            color: service.color.clone(),
        }
    }
}

/// Service name nested into admin booking listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceName {
    pub name: String,
}

impl From<&Service> for ServiceName {
    fn from(service: &Service) -> Self {
        Self {
            name: service.name.clone(),
        }
    }
}
