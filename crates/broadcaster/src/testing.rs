//! Channel doubles for tests in this and dependent crates.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use raksha_core::{CoreError, NotificationChannel};

/// Records every dispatch; optionally rejects chosen numbers.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    fail_for: HashSet<String>,
    attempts: Mutex<Vec<String>>,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject dispatches to the given numbers.
    pub fn failing_for<I, S>(numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fail_for: numbers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Every number a dispatch was attempted for, in order.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// Accepted `(number, body)` pairs, in order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn dispatch(&self, phone_number: &str, body: &str) -> Result<(), CoreError> {
        if let Ok(mut attempts) = self.attempts.lock() {
            attempts.push(phone_number.to_string());
        }
        if self.fail_for.contains(phone_number) {
            return Err(CoreError::Dispatch(format!("rejected {phone_number}")));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((phone_number.to_string(), body.to_string()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "RecordingChannel"
    }
}

/// A channel whose dispatch never completes.
#[derive(Debug, Default)]
pub struct HangingChannel;

#[async_trait]
impl NotificationChannel for HangingChannel {
    async fn dispatch(&self, _phone_number: &str, _body: &str) -> Result<(), CoreError> {
        std::future::pending::<()>().await;
        Ok(())
    }

    fn name(&self) -> &str {
        "HangingChannel"
    }
}
