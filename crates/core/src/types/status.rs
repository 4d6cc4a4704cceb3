//! Status enums for bookings and payments.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Booking lifecycle status.
///
/// New bookings start as `confirmed`. The payment page moves them to
/// `advance_paid` when only the advance share was paid. Admins may set any
/// other value; unknown strings are kept verbatim in [`BookingStatus::Other`]
/// so they survive a round trip through the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    AdvancePaid,
    Completed,
    Cancelled,
    Other(String),
}

impl BookingStatus {
    /// Wire representation, e.g. `advance_paid`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Confirmed => "confirmed",
            Self::AdvancePaid => "advance_paid",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for BookingStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "confirmed" => Self::Confirmed,
            "advance_paid" => Self::AdvancePaid,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Other(s),
        }
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment state recorded on a booking after checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

/// How much of the booking total the customer pays up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// A percentage of the total now, the balance after the job.
    #[default]
    Advance,
    /// The full total now.
    Full,
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Advance => write!(f, "advance"),
            Self::Full => write!(f, "full"),
        }
    }
}

impl FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "advance" => Ok(Self::Advance),
            "full" => Ok(Self::Full),
            _ => Err(format!("invalid payment type: {s}")),
        }
    }
}

/// Kind of booking notification sent to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Confirmation,
    Update,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_default_is_confirmed() {
        assert_eq!(BookingStatus::default(), BookingStatus::Confirmed);
        assert_eq!(
            serde_json::to_string(&BookingStatus::default()).unwrap(),
            "\"confirmed\""
        );
    }

    #[test]
    fn test_booking_status_known_values() {
        let status: BookingStatus = serde_json::from_str("\"advance_paid\"").unwrap();
        assert_eq!(status, BookingStatus::AdvancePaid);
        assert_eq!(status.to_string(), "advance_paid");
    }

    #[test]
    fn test_booking_status_keeps_admin_values() {
        let status: BookingStatus = serde_json::from_str("\"rescheduled\"").unwrap();
        assert_eq!(status, BookingStatus::Other("rescheduled".to_owned()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"rescheduled\"");
    }

    #[test]
    fn test_payment_type_parse() {
        assert_eq!("full".parse::<PaymentType>().unwrap(), PaymentType::Full);
        assert!("half".parse::<PaymentType>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentType::Advance).unwrap(),
            "\"advance\""
        );
    }

    #[test]
    fn test_payment_status_wire_format() {
        let status: PaymentStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(status, PaymentStatus::Paid);
    }
}
