//! Booking domain types.
//!
//! A booking ties a verified user to a service for a date, time, place and
//! number of hours. The total cost is computed by the client as hourly rate
//! times hours and stored as submitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skybook_core::{
    BookingId, BookingStatus, CurrencyCode, PaymentStatus, PaymentType, Price, ServiceId, UserId,
};

use super::{ServiceName, ServiceSummary, UserSummary, double_option};
use crate::validation::ValidationErrors;

/// A stored booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub service_id: ServiceId,
    pub location: String,
    /// Calendar date as entered, e.g. `2026-11-02`.
    pub date: String,
    /// Clock time as entered, e.g. `14:30`.
    pub time: String,
    /// Booked hours, at least 1.
    pub duration: u32,
    pub total_cost: Price,
    pub requirements: Option<String>,
    pub status: BookingStatus,
    pub payment_status: Option<PaymentStatus>,
    pub payment_type: Option<PaymentType>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: UserId,
    pub service_id: ServiceId,
    pub location: String,
    pub date: String,
    pub time: String,
    pub duration: u32,
    pub total_cost: Price,
    pub requirements: Option<String>,
}

/// Booking creation request body.
///
/// Unknown fields (such as a client-chosen `status`) are ignored: every
/// booking starts out `confirmed`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub user_id: Option<UserId>,
    pub service_id: Option<ServiceId>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<i64>,
    pub total_cost: Option<Price>,
    pub requirements: Option<String>,
}

impl BookingInput {
    /// Validate into a [`NewBooking`].
    ///
    /// # Errors
    ///
    /// Returns every violated field.
    pub fn validate(self) -> Result<NewBooking, ValidationErrors> {
        let mut errors = ValidationErrors::new("Invalid booking data");

        let user_id = errors.required("userId", self.user_id);
        let service_id = errors.required("serviceId", self.service_id);
        let location = errors.non_empty("location", "Location", self.location);
        let date = errors.non_empty("date", "Date", self.date);
        let time = errors.non_empty("time", "Time", self.time);
        let duration = errors
            .required("duration", self.duration)
            .and_then(|hours| check_duration(&mut errors, hours));
        let total_cost = errors.required("totalCost", self.total_cost);
        errors.amount_in_range("totalCost", "Total cost", total_cost);

        errors.finish(|| {
            Some(NewBooking {
                user_id: user_id?,
                service_id: service_id?,
                location: location?,
                date: date?,
                time: time?,
                duration: duration?,
                total_cost: total_cost?,
                requirements: self.requirements,
            })
        })
    }
}

/// Booking update request body (payment completion, admin edits).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatchInput {
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<i64>,
    pub total_cost: Option<Price>,
    #[serde(default, deserialize_with = "double_option")]
    pub requirements: Option<Option<String>>,
    pub status: Option<BookingStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub payment_status: Option<Option<PaymentStatus>>,
    #[serde(default, deserialize_with = "double_option")]
    pub payment_type: Option<Option<PaymentType>>,
}

impl BookingPatchInput {
    /// Validate the fields that are present into a [`BookingPatch`].
    ///
    /// # Errors
    ///
    /// Returns every violated field.
    pub fn validate(self) -> Result<BookingPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new("Invalid booking data");

        errors.non_empty_if_present("location", "Location", self.location.as_ref());
        errors.non_empty_if_present("date", "Date", self.date.as_ref());
        errors.non_empty_if_present("time", "Time", self.time.as_ref());
        let duration = self
            .duration
            .and_then(|hours| check_duration(&mut errors, hours));
        errors.amount_in_range("totalCost", "Total cost", self.total_cost);
        if self
            .status
            .as_ref()
            .is_some_and(|status| status.as_str().trim().is_empty())
        {
            errors.add("status", "Status cannot be empty");
        }

        errors.finish(|| {
            Some(BookingPatch {
                location: self.location,
                date: self.date,
                time: self.time,
                duration,
                total_cost: self.total_cost,
                requirements: self.requirements,
                status: self.status,
                payment_status: self.payment_status,
                payment_type: self.payment_type,
            })
        })
    }
}

/// Partial update for a booking. Ids and the creation time are fixed.
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<u32>,
    pub total_cost: Option<Price>,
    pub requirements: Option<Option<String>>,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<Option<PaymentStatus>>,
    pub payment_type: Option<Option<PaymentType>>,
}

impl BookingPatch {
    /// Shallow-merge into `booking`.
    pub fn apply(self, booking: &mut Booking) {
        if let Some(location) = self.location {
            booking.location = location;
        }
        if let Some(date) = self.date {
            booking.date = date;
        }
        if let Some(time) = self.time {
            booking.time = time;
        }
        if let Some(duration) = self.duration {
            booking.duration = duration;
        }
        if let Some(total_cost) = self.total_cost {
            booking.total_cost = total_cost;
        }
        if let Some(requirements) = self.requirements {
            booking.requirements = requirements;
        }
        if let Some(status) = self.status {
            booking.status = status;
        }
        if let Some(payment_status) = self.payment_status {
            booking.payment_status = payment_status;
        }
        if let Some(payment_type) = self.payment_type {
            booking.payment_type = payment_type;
        }
    }
}

fn check_duration(errors: &mut ValidationErrors, hours: i64) -> Option<u32> {
    match u32::try_from(hours) {
        Ok(hours) if hours >= 1 => Some(hours),
        _ => {
            errors.add("duration", "Duration must be at least 1 hour");
            None
        }
    }
}

/// A booking with its service details, as listed for its owner.
#[derive(Debug, Clone, Serialize)]
pub struct UserBooking {
    #[serde(flatten)]
    pub booking: Booking,
    /// `null` if the service was deleted after booking.
    pub service: Option<ServiceSummary>,
}

/// A booking with customer and service, as listed for admins.
#[derive(Debug, Clone, Serialize)]
pub struct AdminBooking {
    #[serde(flatten)]
    pub booking: Booking,
    pub user: Option<UserSummary>,
    pub service: Option<ServiceName>,
}

/// Bill for a booking: what is due now and what is due later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub booking_id: BookingId,
    pub service: Option<ServiceSummary>,
    pub hours: u32,
    /// Current hourly rate of the service, if it still exists.
    pub rate_per_hour: Option<Price>,
    pub subtotal: Price,
    pub total: Price,
    pub advance_percent: u32,
    pub advance_amount: Price,
    pub balance_after_advance: Price,
    pub currency: CurrencyCode,
}

impl CostBreakdown {
    /// Build the bill for `booking`. The stored total is authoritative; the
    /// service's current rate is shown for reference only.
    #[must_use]
    pub fn new(
        booking: &Booking,
        service: Option<&super::Service>,
        advance_percent: u32,
        currency: CurrencyCode,
    ) -> Self {
        let total = booking.total_cost;
        let advance_amount = total.percent(advance_percent);

        Self {
            booking_id: booking.id,
            service: service.map(ServiceSummary::from),
            hours: booking.duration,
            rate_per_hour: service.map(|s| s.price_per_hour),
            subtotal: total,
            total,
            advance_percent,
            advance_amount,
            balance_after_advance: total - advance_amount,
            currency,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_booking() -> Booking {
        Booking {
            id: BookingId::new(1),
            user_id: UserId::new(1),
            service_id: ServiceId::new(1),
            location: "Baner, Pune".to_owned(),
            date: "2026-11-02".to_owned(),
            time: "09:00".to_owned(),
            duration: 2,
            total_cost: "300.00".parse().unwrap(),
            requirements: None,
            status: BookingStatus::Confirmed,
            payment_status: None,
            payment_type: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_input_valid() {
        let input: BookingInput = serde_json::from_value(json!({
            "userId": 1,
            "serviceId": 1,
            "location": "Baner, Pune",
            "date": "2026-11-02",
            "time": "09:00",
            "duration": 2,
            "totalCost": "300.00",
            "status": "advance_paid"
        }))
        .unwrap();

        let booking = input.validate().unwrap();
        assert_eq!(booking.duration, 2);
        assert_eq!(booking.requirements, None);
    }

    #[test]
    fn test_input_lists_every_violation() {
        let input: BookingInput = serde_json::from_value(json!({
            "userId": 1,
            "serviceId": 1,
            "location": "",
            "date": "",
            "time": "",
            "duration": 0,
            "totalCost": 0
        }))
        .unwrap();

        let err = input.validate().unwrap_err();
        assert_eq!(err.message(), "Invalid booking data");
        for field in ["location", "date", "time", "duration"] {
            assert!(err.has_field(field), "expected error for {field}");
        }
        assert!(!err.has_field("totalCost"));
    }

    #[test]
    fn test_total_cost_above_limit_rejected() {
        let input: BookingInput = serde_json::from_value(json!({
            "userId": 1,
            "serviceId": 1,
            "location": "Baner, Pune",
            "date": "2026-11-02",
            "time": "09:00",
            "duration": 2,
            "totalCost": "50000000000000000000000000000"
        }))
        .unwrap();
        let err = input.validate().unwrap_err();
        assert!(err.has_field("totalCost"));
        assert_eq!(err.errors()[0].message, "Total cost cannot exceed 99999999.99");

        let patch: BookingPatchInput =
            serde_json::from_value(json!({ "totalCost": "100000000.00" })).unwrap();
        assert!(patch.validate().unwrap_err().has_field("totalCost"));

        let patch: BookingPatchInput =
            serde_json::from_value(json!({ "totalCost": "99999999.99" })).unwrap();
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_input_negative_duration() {
        let input = BookingInput {
            duration: Some(-3),
            ..BookingInput::default()
        };
        assert!(input.validate().unwrap_err().has_field("duration"));
    }

    #[test]
    fn test_patch_payment_completion() {
        let patch: BookingPatchInput = serde_json::from_value(json!({
            "status": "advance_paid",
            "paymentStatus": "paid"
        }))
        .unwrap();

        let mut booking = sample_booking();
        patch.validate().unwrap().apply(&mut booking);

        assert_eq!(booking.status, BookingStatus::AdvancePaid);
        assert_eq!(booking.payment_status, Some(PaymentStatus::Paid));
        assert_eq!(booking.location, "Baner, Pune");
    }

    #[test]
    fn test_patch_null_clears_requirements() {
        let mut booking = sample_booking();
        booking.requirements = Some("4K footage".to_owned());

        let patch: BookingPatchInput =
            serde_json::from_value(json!({ "requirements": null })).unwrap();
        patch.validate().unwrap().apply(&mut booking);
        assert_eq!(booking.requirements, None);

        let mut booking = sample_booking();
        booking.requirements = Some("4K footage".to_owned());
        let patch: BookingPatchInput = serde_json::from_value(json!({})).unwrap();
        patch.validate().unwrap().apply(&mut booking);
        assert_eq!(booking.requirements.as_deref(), Some("4K footage"));
    }

    #[test]
    fn test_patch_rejects_zero_duration() {
        let patch: BookingPatchInput = serde_json::from_value(json!({ "duration": 0 })).unwrap();
        assert!(patch.validate().unwrap_err().has_field("duration"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(sample_booking()).unwrap();
        assert_eq!(value["userId"], 1);
        assert_eq!(value["totalCost"], "300.00");
        assert_eq!(value["status"], "confirmed");
        assert!(value["requirements"].is_null());
    }

    #[test]
    fn test_cost_breakdown() {
        let bill = CostBreakdown::new(&sample_booking(), None, 30, CurrencyCode::INR);
        assert_eq!(bill.advance_amount.to_string(), "90.00");
        assert_eq!(bill.balance_after_advance.to_string(), "210.00");
        assert_eq!(bill.total, bill.subtotal);
        assert_eq!(bill.rate_per_hour, None);
    }

    #[test]
    fn test_cost_breakdown_of_huge_total() {
        let mut booking = sample_booking();
        booking.total_cost = "50000000000000000000000000000".parse().unwrap();

        let bill = CostBreakdown::new(&booking, None, 30, CurrencyCode::INR);
        assert!(bill.advance_amount < bill.total);
        assert!(!bill.balance_after_advance.is_negative());
    }

    #[test]
    fn test_user_booking_flattens() {
        let view = UserBooking {
            booking: sample_booking(),
            service: None,
        };
        let value = serde_json::to_value(view).unwrap();
        assert_eq!(value["id"], 1);
        assert!(value["service"].is_null());
    }
}
