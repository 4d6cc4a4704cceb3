//! Customer notifications: verification codes, booking emails and SMS.
//!
//! Delivery goes through the [`Notifier`] trait so the rest of the crate
//! never talks to SMTP directly. [`SmtpNotifier`] sends real mail via lettre
//! with Askama templates; [`LogNotifier`] only writes to the log and is used
//! when no SMTP server is configured.

use askama::Template;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use skybook_core::{Email, NotificationKind};

use crate::config::EmailConfig;

/// HTML template for verification code email.
#[derive(Template)]
#[template(path = "email/verification_code.html")]
struct VerificationCodeEmailHtml<'a> {
    code: &'a str,
    ttl_minutes: i64,
}

/// Plain text template for verification code email.
#[derive(Template)]
#[template(path = "email/verification_code.txt")]
struct VerificationCodeEmailText<'a> {
    code: &'a str,
    ttl_minutes: i64,
}

#[derive(Template)]
#[template(path = "email/booking_update.html")]
struct BookingUpdateEmailHtml<'a> {
    heading: &'a str,
    verb: &'a str,
    notice: &'a BookingNotice,
}

#[derive(Template)]
#[template(path = "email/booking_update.txt")]
struct BookingUpdateEmailText<'a> {
    heading: &'a str,
    verb: &'a str,
    notice: &'a BookingNotice,
}

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// The delivery channel refused the message.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// What a booking email says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingNotice {
    pub kind: NotificationKind,
    pub customer_name: String,
    pub service_name: String,
    pub date: String,
    pub time: String,
    pub duration: u32,
    pub location: String,
    /// Total with currency symbol, e.g. `₹300.00`.
    pub total: String,
    /// e.g. "Full payment completed".
    pub payment_line: String,
}

impl BookingNotice {
    /// Email subject line.
    #[must_use]
    pub const fn subject(&self) -> &'static str {
        match self.kind {
            NotificationKind::Confirmation => "Booking Confirmed - SkyBook Pro",
            NotificationKind::Update => "Booking Update - SkyBook Pro",
        }
    }

    const fn verb(&self) -> &'static str {
        match self.kind {
            NotificationKind::Confirmation => "confirmed",
            NotificationKind::Update => "updated",
        }
    }

    const fn heading(&self) -> &'static str {
        match self.kind {
            NotificationKind::Confirmation => "Booking Confirmed",
            NotificationKind::Update => "Booking Updated",
        }
    }
}

/// Outbound customer notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a verification code to `to`.
    async fn send_verification_code(&self, to: &Email, code: &str)
    -> Result<(), NotificationError>;

    /// Email a booking confirmation or update.
    async fn send_booking_update(
        &self,
        to: &Email,
        notice: &BookingNotice,
    ) -> Result<(), NotificationError>;

    /// Send a text message.
    async fn send_sms(&self, phone: &str, body: &str) -> Result<(), NotificationError>;
}

/// Notifier that delivers email over SMTP.
///
/// There is no SMS gateway; text messages are written to the log.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    code_ttl_minutes: i64,
}

impl SmtpNotifier {
    /// Create a new SMTP notifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP transport cannot be built.
    pub fn new(config: &EmailConfig, code_ttl_minutes: i64) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            code_ttl_minutes,
        })
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &Email,
        subject: &str,
        text_body: String,
        html_body: String,
    ) -> Result<(), NotificationError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotificationError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|_| NotificationError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_verification_code(
        &self,
        to: &Email,
        code: &str,
    ) -> Result<(), NotificationError> {
        let ttl_minutes = self.code_ttl_minutes;
        let html = VerificationCodeEmailHtml { code, ttl_minutes }.render()?;
        let text = VerificationCodeEmailText { code, ttl_minutes }.render()?;

        self.send_multipart_email(to, "SkyBook Pro - Email Verification", text, html)
            .await
    }

    async fn send_booking_update(
        &self,
        to: &Email,
        notice: &BookingNotice,
    ) -> Result<(), NotificationError> {
        let (heading, verb) = (notice.heading(), notice.verb());
        let html = BookingUpdateEmailHtml {
            heading,
            verb,
            notice,
        }
        .render()?;
        let text = BookingUpdateEmailText {
            heading,
            verb,
            notice,
        }
        .render()?;

        self.send_multipart_email(to, notice.subject(), text, html)
            .await
    }

    async fn send_sms(&self, phone: &str, body: &str) -> Result<(), NotificationError> {
        tracing::info!(to = %phone, body = %body, "SMS sent (no gateway configured)");
        Ok(())
    }
}

/// Notifier for local development: logs every message and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_verification_code(
        &self,
        to: &Email,
        code: &str,
    ) -> Result<(), NotificationError> {
        tracing::info!(to = %to, code = %code, "Verification code (SMTP not configured)");
        Ok(())
    }

    async fn send_booking_update(
        &self,
        to: &Email,
        notice: &BookingNotice,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            to = %to,
            subject = notice.subject(),
            service = %notice.service_name,
            date = %notice.date,
            time = %notice.time,
            "Booking email (SMTP not configured)"
        );
        Ok(())
    }

    async fn send_sms(&self, phone: &str, body: &str) -> Result<(), NotificationError> {
        tracing::info!(to = %phone, body = %body, "SMS (no gateway configured)");
        Ok(())
    }
}

/// Generate a 6-digit verification code, uniform over 100000-999999.
#[must_use]
pub fn generate_verification_code() -> String {
    use rand::Rng;
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}
