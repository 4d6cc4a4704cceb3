//! User domain types.
//!
//! A user is the customer who books drone services. Users are created
//! unverified and become verified once they echo back the one-time code
//! emailed to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skybook_core::{Email, UserId};

use crate::validation::ValidationErrors;

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub full_name: String,
    /// Email address (unique across users).
    pub email: Email,
    /// Phone number, free text.
    pub phone: String,
    /// Whether the email has been verified.
    pub is_verified: bool,
    /// Outstanding one-time code, if any.
    pub otp: Option<String>,
    /// When the outstanding code stops being accepted.
    pub otp_expires: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Where a user is in email verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationState<'a> {
    /// Registered, no code issued.
    Unverified,
    /// A code has been issued and not yet confirmed.
    Pending {
        code: &'a str,
        expires_at: Option<DateTime<Utc>>,
    },
    /// Email confirmed.
    Verified,
}

/// Why a submitted code was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CodeRejected {
    #[error("Invalid OTP")]
    Invalid,
    #[error("OTP has expired")]
    Expired,
}

impl User {
    /// Current verification state.
    #[must_use]
    pub fn verification_state(&self) -> VerificationState<'_> {
        if self.is_verified {
            return VerificationState::Verified;
        }
        match self.otp.as_deref() {
            Some(code) => VerificationState::Pending {
                code,
                expires_at: self.otp_expires,
            },
            None => VerificationState::Unverified,
        }
    }

    /// Check a submitted code and, if it is accepted, mark the user verified
    /// and clear the code.
    ///
    /// The code is compared before expiry, so a wrong code on an expired
    /// pending state reports `Invalid`. On rejection nothing is changed.
    ///
    /// # Errors
    ///
    /// Returns `CodeRejected::Invalid` if the code does not exactly match the
    /// stored one, `CodeRejected::Expired` if `now` is past the expiry.
    pub fn confirm_code(&mut self, submitted: &str, now: DateTime<Utc>) -> Result<(), CodeRejected> {
        if self.otp.as_deref() != Some(submitted) {
            return Err(CodeRejected::Invalid);
        }
        if self.otp_expires.is_some_and(|expires| now > expires) {
            return Err(CodeRejected::Expired);
        }

        self.is_verified = true;
        self.otp = None;
        self.otp_expires = None;
        Ok(())
    }
}

/// Fields for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: Email,
    pub phone: String,
}

/// Registration request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl RegisterInput {
    /// Validate into a [`NewUser`].
    ///
    /// # Errors
    ///
    /// Returns every violated field.
    pub fn validate(self) -> Result<NewUser, ValidationErrors> {
        let mut errors = ValidationErrors::new("Invalid input data");

        let full_name = errors.non_empty("fullName", "Full name", self.full_name);
        let phone = errors.non_empty("phone", "Phone", self.phone);
        let email = errors
            .required("email", self.email)
            .and_then(|raw| match Email::parse(&raw) {
                Ok(email) => Some(email),
                Err(e) => {
                    errors.add("email", e.to_string());
                    None
                }
            });

        errors.finish(|| {
            Some(NewUser {
                full_name: full_name?,
                email: email?,
                phone: phone?,
            })
        })
    }
}

/// Partial update for a user. `None` leaves a field untouched; for the
/// nullable code fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub is_verified: Option<bool>,
    pub otp: Option<Option<String>>,
    pub otp_expires: Option<Option<DateTime<Utc>>>,
}

impl UserPatch {
    /// Patch that records a freshly issued code.
    #[must_use]
    pub fn pending_code(code: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            otp: Some(Some(code)),
            otp_expires: Some(Some(expires_at)),
            ..Self::default()
        }
    }

    /// Shallow-merge into `user`.
    pub fn apply(self, user: &mut User) {
        if let Some(full_name) = self.full_name {
            user.full_name = full_name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(is_verified) = self.is_verified {
            user.is_verified = is_verified;
        }
        if let Some(otp) = self.otp {
            user.otp = otp;
        }
        if let Some(otp_expires) = self.otp_expires {
            user.otp_expires = otp_expires;
        }
    }
}

/// User profile as returned by `GET /api/user/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    pub phone: String,
    pub is_verified: bool,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            is_verified: user.is_verified,
        }
    }
}

/// User identity returned after a successful verification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedUser {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
}

impl From<&User> for VerifiedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// User summary nested into admin booking listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub full_name: String,
    pub email: Email,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            email: user.email.clone(),
        }
    }
}
