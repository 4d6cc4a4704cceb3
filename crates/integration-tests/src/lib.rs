//! Integration tests for SkyBook.
//!
//! Each test spawns the full router on an ephemeral port and drives it over
//! HTTP with `reqwest`. Outbound notifications are captured by
//! [`RecordingNotifier`] so tests can read back the emailed codes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p skybook-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Value, json};

use skybook_api::config::{
    AdminConfig, ApiConfig, BookingConfig, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD,
};
use skybook_api::services::email::BookingNotice;
use skybook_api::services::{NotificationError, Notifier, SimulatedPaymentProvider};
use skybook_api::state::AppState;
use skybook_api::store::EntityStore;
use skybook_core::Email;

/// Captures every outbound message instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    codes: Mutex<Vec<(String, String)>>,
    bookings: Mutex<Vec<(String, BookingNotice)>>,
    sms: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    /// Most recent code emailed to `email`.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.codes
            .lock()
            .expect("notifier lock")
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }

    pub fn booking_notices(&self) -> Vec<(String, BookingNotice)> {
        self.bookings.lock().expect("notifier lock").clone()
    }

    pub fn sms_sent(&self) -> Vec<(String, String)> {
        self.sms.lock().expect("notifier lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_verification_code(
        &self,
        to: &Email,
        code: &str,
    ) -> Result<(), NotificationError> {
        self.codes
            .lock()
            .expect("notifier lock")
            .push((to.to_string(), code.to_owned()));
        Ok(())
    }

    async fn send_booking_update(
        &self,
        to: &Email,
        notice: &BookingNotice,
    ) -> Result<(), NotificationError> {
        self.bookings
            .lock()
            .expect("notifier lock")
            .push((to.to_string(), notice.clone()));
        Ok(())
    }

    async fn send_sms(&self, phone: &str, body: &str) -> Result<(), NotificationError> {
        self.sms
            .lock()
            .expect("notifier lock")
            .push((phone.to_owned(), body.to_owned()));
        Ok(())
    }
}

/// Configuration used by every test server: seeded catalog, default admin.
#[must_use]
pub fn test_config() -> ApiConfig {
    ApiConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        admin: AdminConfig {
            email: Email::parse(DEFAULT_ADMIN_EMAIL).expect("valid admin email"),
            password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
            uses_default_password: true,
        },
        booking: BookingConfig::default(),
        seed_demo_data: true,
        email: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A running API server bound to an ephemeral local port.
pub struct TestServer {
    pub client: Client,
    pub notifier: Arc<RecordingNotifier>,
    addr: SocketAddr,
}

impl TestServer {
    /// Start a server with the seeded catalog and demo user.
    pub async fn spawn() -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        let state = AppState::new(
            test_config(),
            EntityStore::seeded().await,
            notifier.clone(),
            Arc::new(SimulatedPaymentProvider),
        );
        let app = skybook_api::router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });

        Self {
            client: Client::new(),
            notifier,
            addr,
        }
    }

    /// Absolute URL for a path on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// `GET` a path and decode the JSON response.
    pub async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request");
        decode(resp).await
    }

    /// Send a JSON body with the given method and decode the JSON response.
    pub async fn send(&self, method: reqwest::Method, path: &str, body: &Value) -> (u16, Value) {
        let resp = self
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await
            .expect("JSON request");
        decode(resp).await
    }

    /// `POST` a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        self.send(reqwest::Method::POST, path, body).await
    }

    /// Register and verify a new customer, returning their id.
    pub async fn verified_user(&self, name: &str, email: &str, phone: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/register",
                &json!({ "fullName": name, "email": email, "phone": phone }),
            )
            .await;
        assert_eq!(status, 200, "register: {body}");
        let user_id = body["userId"].as_i64().expect("userId");

        let code = self
            .notifier
            .last_code_for(email)
            .expect("verification code emailed");
        let (status, body) = self
            .post(
                "/api/verify-otp",
                &json!({ "userId": user_id, "otp": code }),
            )
            .await;
        assert_eq!(status, 200, "verify: {body}");

        user_id
    }
}

async fn decode(resp: reqwest::Response) -> (u16, Value) {
    let status = resp.status().as_u16();
    let body = resp.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}
