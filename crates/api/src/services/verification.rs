//! Registration and email verification.
//!
//! A user moves `Unverified -> Pending(code, expiry) -> Verified`. Issuing a
//! code again while pending simply replaces the code and its expiry; there
//! is no resend limit.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::instrument;

use skybook_core::UserId;

use super::email::{NotificationError, Notifier, generate_verification_code};
use crate::models::{CodeRejected, RegisterInput, User, UserPatch};
use crate::store::{RepositoryError, UserRepository};
use crate::validation::ValidationErrors;

/// Errors that can occur during registration and verification.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// Registration input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Another user already registered this email.
    #[error("User already exists with this email")]
    EmailTaken,

    /// No user with the given id.
    #[error("User not found")]
    UserNotFound,

    /// Submitted code does not match the stored one.
    #[error("Invalid OTP")]
    InvalidCode,

    /// Submitted code matched but is past its expiry.
    #[error("OTP has expired")]
    CodeExpired,

    /// The code was stored but could not be delivered.
    #[error("Failed to send verification email: {0}")]
    NotificationFailed(#[from] NotificationError),
}

impl From<CodeRejected> for VerificationError {
    fn from(rejected: CodeRejected) -> Self {
        match rejected {
            CodeRejected::Invalid => Self::InvalidCode,
            CodeRejected::Expired => Self::CodeExpired,
        }
    }
}

/// Registration and verification service.
pub struct VerificationService<'a> {
    users: UserRepository<'a>,
    notifier: &'a dyn Notifier,
    code_ttl: Duration,
}

impl<'a> VerificationService<'a> {
    /// Create a new verification service.
    #[must_use]
    pub const fn new(
        users: UserRepository<'a>,
        notifier: &'a dyn Notifier,
        code_ttl: Duration,
    ) -> Self {
        Self {
            users,
            notifier,
            code_ttl,
        }
    }

    /// Register a new user and email them a verification code.
    ///
    /// # Errors
    ///
    /// Returns `VerificationError::Validation` for bad input,
    /// `VerificationError::EmailTaken` if the email is registered, and
    /// `VerificationError::NotificationFailed` if the code could not be sent
    /// (the user and code are kept).
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterInput) -> Result<User, VerificationError> {
        let new_user = input.validate()?;
        let user = self.users.create(new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => VerificationError::EmailTaken,
            RepositoryError::NotFound => VerificationError::UserNotFound,
        })?;
        tracing::info!(user_id = %user.id, "User registered");

        self.issue_code(user.id).await
    }

    /// Issue a fresh code to a user, replacing any outstanding one.
    ///
    /// # Errors
    ///
    /// Returns `VerificationError::UserNotFound` if the user does not exist,
    /// `VerificationError::NotificationFailed` if delivery failed. A failed
    /// delivery does not roll back the stored code.
    pub async fn issue_code(&self, user_id: UserId) -> Result<User, VerificationError> {
        self.issue_code_at(user_id, Utc::now()).await
    }

    /// [`issue_code`](Self::issue_code) with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`issue_code`](Self::issue_code).
    #[instrument(skip(self, now), fields(user_id = %user_id))]
    pub async fn issue_code_at(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<User, VerificationError> {
        let code = generate_verification_code();
        let patch = UserPatch::pending_code(code.clone(), now + self.code_ttl);

        let user = self
            .users
            .update(user_id, patch)
            .await
            .map_err(|_| VerificationError::UserNotFound)?;

        if let Err(e) = self.notifier.send_verification_code(&user.email, &code).await {
            tracing::error!(error = %e, "Failed to deliver verification code");
            return Err(e.into());
        }

        tracing::info!("Verification code issued");
        Ok(user)
    }

    /// Check a submitted code. On success the user becomes verified and the
    /// code is cleared in one store mutation.
    ///
    /// # Errors
    ///
    /// Returns `VerificationError::UserNotFound`, `VerificationError::InvalidCode`
    /// or `VerificationError::CodeExpired`. On error the user is unchanged.
    pub async fn verify_code(
        &self,
        user_id: UserId,
        code: &str,
    ) -> Result<User, VerificationError> {
        self.verify_code_at(user_id, code, Utc::now()).await
    }

    /// [`verify_code`](Self::verify_code) with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`verify_code`](Self::verify_code).
    #[instrument(skip(self, code, now), fields(user_id = %user_id))]
    pub async fn verify_code_at(
        &self,
        user_id: UserId,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<User, VerificationError> {
        let user = self
            .users
            .try_update(user_id, |user| user.confirm_code(code, now))
            .await?
            .ok_or(VerificationError::UserNotFound)?;

        tracing::info!("Email verified");
        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::VerificationState;
    use crate::services::testing::{FailingNotifier, RecordingNotifier};
    use crate::store::EntityStore;

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput {
            full_name: Some("Asha Rao".to_owned()),
            email: Some(email.to_owned()),
            phone: Some("+919800000000".to_owned()),
        }
    }

    #[tokio::test]
    async fn test_register_issues_code() {
        let store = EntityStore::new();
        let notifier = RecordingNotifier::default();
        let service = VerificationService::new(store.users(), &notifier, Duration::minutes(10));

        let user = service.register(register_input("a@x.com")).await.unwrap();

        assert!(!user.is_verified);
        let sent = notifier.last_code_for("a@x.com").unwrap();
        assert_eq!(user.otp.as_deref(), Some(sent.as_str()));
        assert!(matches!(
            user.verification_state(),
            VerificationState::Pending { .. }
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let store = EntityStore::new();
        let notifier = RecordingNotifier::default();
        let service = VerificationService::new(store.users(), &notifier, Duration::minutes(10));

        service.register(register_input("a@x.com")).await.unwrap();
        let err = service
            .register(register_input("a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, VerificationError::EmailTaken));
        assert_eq!(store.users().count().await, 1);
    }

    #[tokio::test]
    async fn test_verify_success_clears_code() {
        let store = EntityStore::new();
        let notifier = RecordingNotifier::default();
        let service = VerificationService::new(store.users(), &notifier, Duration::minutes(10));

        let user = service.register(register_input("a@x.com")).await.unwrap();
        let code = user.otp.unwrap();

        let verified = service.verify_code(user.id, &code).await.unwrap();
        assert!(verified.is_verified);
        assert_eq!(verified.otp, None);
        assert_eq!(verified.otp_expires, None);
    }

    #[tokio::test]
    async fn test_verify_wrong_code_keeps_state() {
        let store = EntityStore::new();
        let notifier = RecordingNotifier::default();
        let service = VerificationService::new(store.users(), &notifier, Duration::minutes(10));

        let user = service.register(register_input("a@x.com")).await.unwrap();
        let wrong = if user.otp.as_deref() == Some("000000") {
            "111111"
        } else {
            "000000"
        };

        let err = service.verify_code(user.id, wrong).await.unwrap_err();
        assert!(matches!(err, VerificationError::InvalidCode));

        let stored = store.users().get_by_id(user.id).await.unwrap();
        assert_eq!(stored.otp, user.otp);
        assert!(!stored.is_verified);
    }

    #[tokio::test]
    async fn test_verify_expired_code() {
        let store = EntityStore::new();
        let notifier = RecordingNotifier::default();
        let service = VerificationService::new(store.users(), &notifier, Duration::minutes(10));

        let user = service.register(register_input("a@x.com")).await.unwrap();
        let issued_at = Utc::now();
        let user = service.issue_code_at(user.id, issued_at).await.unwrap();
        let code = user.otp.unwrap();

        let err = service
            .verify_code_at(user.id, &code, issued_at + Duration::minutes(11))
            .await
            .unwrap_err();
        assert!(matches!(err, VerificationError::CodeExpired));
    }

    #[tokio::test]
    async fn test_resend_replaces_code() {
        let store = EntityStore::new();
        let notifier = RecordingNotifier::default();
        let service = VerificationService::new(store.users(), &notifier, Duration::minutes(10));

        let now = Utc::now();
        let user = service.register(register_input("a@x.com")).await.unwrap();
        let first = service.issue_code_at(user.id, now).await.unwrap();
        let second = service
            .issue_code_at(user.id, now + Duration::minutes(5))
            .await
            .unwrap();

        assert_eq!(second.otp_expires, Some(now + Duration::minutes(15)));
        assert!(second.otp_expires > first.otp_expires);
        assert_eq!(notifier.codes_sent(), 3);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let store = EntityStore::new();
        let notifier = RecordingNotifier::default();
        let service = VerificationService::new(store.users(), &notifier, Duration::minutes(10));

        assert!(matches!(
            service.issue_code(UserId::new(99)).await.unwrap_err(),
            VerificationError::UserNotFound
        ));
        assert!(matches!(
            service
                .verify_code(UserId::new(99), "123456")
                .await
                .unwrap_err(),
            VerificationError::UserNotFound
        ));
    }

    #[tokio::test]
    async fn test_failed_delivery_keeps_code() {
        let store = EntityStore::new();
        let notifier = FailingNotifier;
        let service = VerificationService::new(store.users(), &notifier, Duration::minutes(10));

        let err = service
            .register(register_input("a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, VerificationError::NotificationFailed(_)));

        let stored = store.users().get_by_id(UserId::new(1)).await.unwrap();
        assert!(stored.otp.is_some());
        assert!(stored.otp_expires.is_some());
    }
}
