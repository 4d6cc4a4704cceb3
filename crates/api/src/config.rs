//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SKYBOOK_HOST` - Bind address (default: 127.0.0.1)
//! - `SKYBOOK_PORT` - Listen port (default: 5000)
//! - `SKYBOOK_ADMIN_EMAIL` - Admin login email (default: admin@skybook.pro)
//! - `SKYBOOK_ADMIN_PASSWORD` - Admin login password (default: admin123)
//! - `SKYBOOK_OTP_TTL_MINUTES` - Verification code lifetime (default: 10)
//! - `SKYBOOK_ADVANCE_PERCENT` - Advance share of a booking total (default: 30)
//! - `SKYBOOK_CURRENCY` - Currency for payments and bills (default: INR)
//! - `SKYBOOK_SEED_DEMO_DATA` - Seed default services and demo user (default: true)
//! - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_FROM` -
//!   SMTP delivery. Either none or all of host/username/password must be set;
//!   without them notifications are written to the log instead.
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use chrono::Duration;
use secrecy::SecretString;
use skybook_core::{CurrencyCode, Email};
use thiserror::Error;

/// Admin email used when `SKYBOOK_ADMIN_EMAIL` is not set.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@skybook.pro";
/// Admin password used when `SKYBOOK_ADMIN_PASSWORD` is not set.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SMTP_FROM: &str = "noreply@skybook.pro";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Admin credential pair
    pub admin: AdminConfig,
    /// Booking and verification rules
    pub booking: BookingConfig,
    /// Seed the default service catalog and the demo user on startup
    pub seed_demo_data: bool,
    /// SMTP configuration (None = log notifications instead of sending)
    pub email: Option<EmailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Admin credential pair.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminConfig {
    /// Admin login email
    pub email: Email,
    /// Admin login password
    pub password: SecretString,
    /// Whether the password is the built-in demo default
    pub uses_default_password: bool,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("uses_default_password", &self.uses_default_password)
            .finish()
    }
}

/// Rules applied by the verification flow and the bill.
#[derive(Debug, Clone, Copy)]
pub struct BookingConfig {
    /// How long an issued verification code stays valid
    pub otp_ttl: Duration,
    /// Share of the total charged as an advance (1-100)
    pub advance_percent: u32,
    /// Currency for payment intents, bills, and notification text
    pub currency: CurrencyCode,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            otp_ttl: Duration::minutes(10),
            advance_percent: 30,
            currency: CurrencyCode::INR,
        }
    }
}

/// SMTP email configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if the
    /// SMTP settings are only partially provided.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("SKYBOOK_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("SKYBOOK_PORT", "5000")?;
        let admin = AdminConfig::from_env()?;
        let booking = BookingConfig::from_env()?;
        let seed_demo_data = parse_env_or_default::<bool>("SKYBOOK_SEED_DEMO_DATA", "true")?;
        let email = EmailConfig::from_env()?;

        Ok(Self {
            host,
            port,
            admin,
            booking,
            seed_demo_data,
            email,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AdminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_email = get_env_or_default("SKYBOOK_ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL);
        let email = Email::parse(&raw_email).map_err(|e| {
            ConfigError::InvalidEnvVar("SKYBOOK_ADMIN_EMAIL".to_string(), e.to_string())
        })?;
        let password = get_optional_env("SKYBOOK_ADMIN_PASSWORD");
        let uses_default_password = password.is_none();

        Ok(Self {
            email,
            password: SecretString::from(
                password.unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            ),
            uses_default_password,
        })
    }
}

impl BookingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let ttl_minutes = parse_env_or_default::<u32>("SKYBOOK_OTP_TTL_MINUTES", "10")?;
        if ttl_minutes == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SKYBOOK_OTP_TTL_MINUTES".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let advance_percent = parse_env_or_default::<u32>("SKYBOOK_ADVANCE_PERCENT", "30")?;
        if !(1..=100).contains(&advance_percent) {
            return Err(ConfigError::InvalidEnvVar(
                "SKYBOOK_ADVANCE_PERCENT".to_string(),
                format!("must be between 1 and 100 (got {advance_percent})"),
            ));
        }

        let currency = get_env_or_default("SKYBOOK_CURRENCY", "INR")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("SKYBOOK_CURRENCY".to_string(), e))?;

        Ok(Self {
            otp_ttl: Duration::minutes(i64::from(ttl_minutes)),
            advance_percent,
            currency,
        })
    }
}

impl EmailConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let host = get_optional_env("SMTP_HOST");
        let username = get_optional_env("SMTP_USERNAME");
        let password = get_optional_env("SMTP_PASSWORD");

        let (smtp_host, smtp_username, smtp_password) = match (host, username, password) {
            (None, None, None) => return Ok(None),
            (Some(host), Some(username), Some(password)) => (host, username, password),
            (host, username, _) => {
                let missing = if host.is_none() {
                    "SMTP_HOST"
                } else if username.is_none() {
                    "SMTP_USERNAME"
                } else {
                    "SMTP_PASSWORD"
                };
                return Err(ConfigError::MissingEnvVar(missing.to_string()));
            }
        };

        Ok(Some(Self {
            smtp_host,
            smtp_port: parse_env_or_default("SMTP_PORT", &DEFAULT_SMTP_PORT.to_string())?,
            smtp_username,
            smtp_password: SecretString::from(smtp_password),
            from_address: get_env_or_default("SMTP_FROM", DEFAULT_SMTP_FROM),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default value.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
