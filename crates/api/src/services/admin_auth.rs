//! Admin sign-in against the configured credential pair.
//!
//! There are no admin sessions or tokens: a successful check just
//! returns the fixed admin profile the dashboard displays.

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use skybook_core::Email;

use crate::config::AdminConfig;

/// Id reported for the single admin profile.
pub const ADMIN_PROFILE_ID: i32 = 999;

/// Errors that can occur during admin authentication.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminAuthError {
    /// Email or password did not match.
    #[error("Invalid admin credentials")]
    InvalidCredentials,
}

/// Admin login request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminLoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The admin identity returned on successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminProfile {
    pub id: i32,
    pub name: &'static str,
    pub email: Email,
    pub role: &'static str,
}

/// Check `input` against the configured admin credentials.
///
/// # Errors
///
/// Returns `AdminAuthError::InvalidCredentials` if either field is missing
/// or does not match.
pub fn authenticate(
    config: &AdminConfig,
    input: &AdminLoginInput,
) -> Result<AdminProfile, AdminAuthError> {
    let email_matches = input.email.as_deref() == Some(config.email.as_str());
    let password_matches = input.password.as_deref() == Some(config.password.expose_secret());

    if !(email_matches && password_matches) {
        tracing::warn!("Rejected admin login");
        return Err(AdminAuthError::InvalidCredentials);
    }

    Ok(AdminProfile {
        id: ADMIN_PROFILE_ID,
        name: "Admin",
        email: config.email.clone(),
        role: "admin",
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::config::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};

    fn admin() -> AdminConfig {
        AdminConfig {
            email: Email::parse(DEFAULT_ADMIN_EMAIL).unwrap(),
            password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
            uses_default_password: true,
        }
    }

    fn login(email: &str, password: &str) -> AdminLoginInput {
        AdminLoginInput {
            email: Some(email.to_owned()),
            password: Some(password.to_owned()),
        }
    }

    #[test]
    fn test_default_credentials_accepted() {
        let profile = authenticate(&admin(), &login("admin@skybook.pro", "admin123")).unwrap();
        assert_eq!(profile.id, 999);
        assert_eq!(profile.role, "admin");

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["name"], "Admin");
        assert_eq!(json["email"], "admin@skybook.pro");
    }

    #[test]
    fn test_wrong_or_missing_credentials_rejected() {
        let config = admin();
        assert_eq!(
            authenticate(&config, &login("admin@skybook.pro", "admin1234")),
            Err(AdminAuthError::InvalidCredentials)
        );
        assert_eq!(
            authenticate(&config, &login("root@skybook.pro", "admin123")),
            Err(AdminAuthError::InvalidCredentials)
        );
        assert_eq!(
            authenticate(&config, &AdminLoginInput::default()),
            Err(AdminAuthError::InvalidCredentials)
        );
    }
}
