//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are always held at two decimal places. Values coming off the wire
//! may be JSON strings (`"150.00"`) or numbers (`150`); both are rescaled on
//! the way in so every stored or serialized price reads like `"150.00"`.
//!
//! The currency is a deployment-wide setting rather than a per-price field,
//! so [`Price`] carries only the amount and [`CurrencyCode`] travels next to
//! it where it matters (payment intents, bills, notification text).

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Sub};
use core::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

/// Number of decimal places every price is kept at.
const SCALE: u32 = 2;

/// A monetary amount in the currency's standard unit (rupees, not paise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, SCALE));

    /// Largest amount a stored price may hold (`99999999.99`, ten digits
    /// with two after the point).
    pub const MAX: Self = Self(Decimal::from_parts(1_410_065_407, 2, 0, false, SCALE));

    /// Create a price, rounding half away from zero to two decimal places.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        let mut rounded = amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(SCALE);
        Self(rounded)
    }

    /// Create a price from an amount in minor units (paise, cents).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, SCALE))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is below zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns true if the amount is above [`Price::MAX`].
    #[must_use]
    pub fn exceeds_max(&self) -> bool {
        self.0 > Self::MAX.0
    }

    /// Multiply by a whole quantity, e.g. hourly rate times booked hours.
    /// Saturates at the largest representable decimal.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// The given percentage of this amount, rounded to two places.
    #[must_use]
    pub fn percent(self, pct: u32) -> Self {
        Self::new(self.0.saturating_mul(Decimal::from(pct)) / Decimal::ONE_HUNDRED)
    }

    /// Sum of two prices, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self::new)
    }

    /// The amount in minor units (e.g. paise), as payment providers expect.
    ///
    /// Returns `None` if the value does not fit in an `i64`.
    #[must_use]
    pub fn to_minor_units(&self) -> Option<i64> {
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor| minor.round().to_i64())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self::new)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <Decimal as Deserialize>::deserialize(deserializer).map(Self::new)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// ISO 4217 currency codes accepted by the payment flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol, e.g. `₹`.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter code, e.g. `INR`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }

    /// Format an amount with this currency's symbol, e.g. `₹300.00`.
    #[must_use]
    pub fn format(&self, price: Price) -> String {
        format!("{}{price}", self.symbol())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INR" => Ok(Self::INR),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}
