//! Notifier doubles for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use skybook_core::Email;

use super::email::{BookingNotice, NotificationError, Notifier};

/// Records everything it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    codes: Mutex<Vec<(String, String)>>,
    bookings: Mutex<Vec<(String, BookingNotice)>>,
    sms: Mutex<Vec<(String, String)>>,
}

#[allow(clippy::unwrap_used)]
impl RecordingNotifier {
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.codes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }

    pub fn codes_sent(&self) -> usize {
        self.codes.lock().unwrap().len()
    }

    pub fn booking_notices(&self) -> Vec<(String, BookingNotice)> {
        self.bookings.lock().unwrap().clone()
    }

    pub fn sms_sent(&self) -> Vec<(String, String)> {
        self.sms.lock().unwrap().clone()
    }
}

#[async_trait]
#[allow(clippy::unwrap_used)]
impl Notifier for RecordingNotifier {
    async fn send_verification_code(
        &self,
        to: &Email,
        code: &str,
    ) -> Result<(), NotificationError> {
        self.codes
            .lock()
            .unwrap()
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
            .unwrap()
            .push((to.to_string(), notice.clone()));
        Ok(())
    }

    async fn send_sms(&self, phone: &str, body: &str) -> Result<(), NotificationError> {
        self.sms
            .lock()
            .unwrap()
            .push((phone.to_owned(), body.to_owned()));
        Ok(())
    }
}

/// Fails every delivery.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send_verification_code(
        &self,
        _to: &Email,
        _code: &str,
    ) -> Result<(), NotificationError> {
        Err(NotificationError::Delivery("mailbox unavailable".to_owned()))
    }

    async fn send_booking_update(
        &self,
        _to: &Email,
        _notice: &BookingNotice,
    ) -> Result<(), NotificationError> {
        Err(NotificationError::Delivery("mailbox unavailable".to_owned()))
    }

    async fn send_sms(&self, _phone: &str, _body: &str) -> Result<(), NotificationError> {
        Err(NotificationError::Delivery("no route to handset".to_owned()))
    }
}
