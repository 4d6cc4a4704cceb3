//! User repository.

use chrono::Utc;

use skybook_core::{Email, UserId};

use super::{RepositoryError, Table};
use crate::models::{NewUser, User, UserPatch};

/// Repository for user records.
pub struct UserRepository<'a> {
    table: &'a Table<UserId, User>,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(table: &'a Table<UserId, User>) -> Self {
        Self { table }
    }

    /// Get a user by their ID.
    pub async fn get_by_id(&self, id: UserId) -> Option<User> {
        self.table.get(id).await
    }

    /// Every user in id order.
    pub async fn list_all(&self) -> Vec<User> {
        self.table.list().await
    }

    /// Get a user by their email address (exact match).
    pub async fn get_by_email(&self, email: &Email) -> Option<User> {
        self.table.find(|user| &user.email == email).await
    }

    /// Create a new unverified user with no pending code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(&self, new: NewUser) -> Result<User, RepositoryError> {
        let NewUser {
            full_name,
            email,
            phone,
        } = new;
        let taken = email.clone();

        self.table
            .insert_unless(
                |user| user.email == taken,
                |id| User {
                    id,
                    full_name,
                    email,
                    phone,
                    is_verified: false,
                    otp: None,
                    otp_expires: None,
                    created_at: Utc::now(),
                },
            )
            .await
            .ok_or_else(|| RepositoryError::Conflict("email already exists".to_owned()))
    }

    /// Merge `patch` into the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, RepositoryError> {
        self.table
            .update(id, |user| patch.apply(user))
            .await
            .ok_or(RepositoryError::NotFound)
    }

    /// Apply a fallible mutation atomically; on error the user is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Ok(None)` if the user does not exist, `Err` with the
    /// mutation's error if it was rejected.
    pub async fn try_update<E>(
        &self,
        id: UserId,
        apply: impl FnOnce(&mut User) -> Result<(), E>,
    ) -> Result<Option<User>, E> {
        self.table.try_update(id, apply).await
    }

    /// Number of registered users.
    pub async fn count(&self) -> usize {
        self.table.count().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            full_name: "Asha Rao".to_owned(),
            email: Email::parse(email).unwrap(),
            phone: "+919800000000".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let table = Table::new();
        let repo = UserRepository::new(&table);
        let user = repo.create(new_user("a@x.com")).await.unwrap();

        assert_eq!(user.id, UserId::new(1));
        assert!(!user.is_verified);
        assert_eq!(user.otp, None);
        assert_eq!(user.otp_expires, None);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let table = Table::new();
        let repo = UserRepository::new(&table);
        repo.create(new_user("a@x.com")).await.unwrap();

        let err = repo.create(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.count().await, 1);

        let other = repo.create(new_user("b@x.com")).await.unwrap();
        assert_eq!(other.id, UserId::new(2));
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let table = Table::new();
        let repo = UserRepository::new(&table);
        let created = repo.create(new_user("a@x.com")).await.unwrap();

        let found = repo
            .get_by_email(&Email::parse("a@x.com").unwrap())
            .await
            .unwrap();
        assert_eq!(found.id, created.id);
        assert!(
            repo.get_by_email(&Email::parse("z@x.com").unwrap())
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let table = Table::new();
        let repo = UserRepository::new(&table);
        let err = repo
            .update(UserId::new(7), UserPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
