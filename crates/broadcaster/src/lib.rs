//! Alert composition and contact fan-out for Raksha.
//!
//! This crate turns a location snapshot into an alert body and hands that body
//! to every emergency contact through a [`NotificationChannel`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use broadcaster::{compose_alert, Broadcaster, LoggingChannel};
//! use raksha_core::{EmergencyContact, Location};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let broadcaster = Broadcaster::new(Arc::new(LoggingChannel));
//! let contacts = vec![EmergencyContact::new("Asha", "+15551230001", "Sister")?];
//!
//! let body = compose_alert(Some(&Location::new(12.97, 77.59)), chrono::Utc::now());
//! let report = broadcaster.fan_out(&contacts, &body).await;
//! println!("{} of {} handed off", report.dispatched(), report.attempted);
//! # Ok(())
//! # }
//! ```

mod channels;
mod composer;
mod drafts;
pub mod testing;

pub use channels::{sms_link, LoggingChannel, SmsLinkChannel};
pub use composer::{compose_alert, map_link, AlertComposer, MedicalContext, TIME_FORMAT};
pub use drafts::Draft;

use std::sync::Arc;
use std::time::Duration;

use raksha_core::{CoreError, EmergencyContact, NotificationChannel};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{info, warn};

/// Default bound on a single dispatch.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur during a single dispatch.
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// The channel rejected the message.
    #[error("channel error: {0}")]
    Channel(#[from] CoreError),

    /// The channel did not accept the message in time.
    #[error("dispatch timed out after {0:?}")]
    Timeout(Duration),
}

/// A dispatch that failed during fan-out.
#[derive(Debug)]
pub struct DispatchFailure {
    pub contact_name: String,
    pub error: BroadcastError,
}

/// Outcome of handing one body to every contact.
#[derive(Debug, Default)]
pub struct FanOutReport {
    /// Contacts a dispatch was attempted for.
    pub attempted: usize,
    pub failures: Vec<DispatchFailure>,
}

impl FanOutReport {
    /// Dispatches the channel accepted.
    pub fn dispatched(&self) -> usize {
        self.attempted - self.failures.len()
    }
}

/// Sends alert bodies to contacts over one channel.
#[derive(Clone)]
pub struct Broadcaster {
    channel: Arc<dyn NotificationChannel>,
    dispatch_timeout: Duration,
}

impl Broadcaster {
    pub fn new(channel: Arc<dyn NotificationChannel>) -> Self {
        Self::with_timeout(channel, DEFAULT_DISPATCH_TIMEOUT)
    }

    pub fn with_timeout(channel: Arc<dyn NotificationChannel>, dispatch_timeout: Duration) -> Self {
        Self {
            channel,
            dispatch_timeout,
        }
    }

    /// Send one body to one phone number, bounded by the dispatch timeout.
    pub async fn send_text(&self, phone_number: &str, body: &str) -> Result<(), BroadcastError> {
        match timeout(self.dispatch_timeout, self.channel.dispatch(phone_number, body)).await {
            Ok(result) => result.map_err(BroadcastError::from),
            Err(_elapsed) => Err(BroadcastError::Timeout(self.dispatch_timeout)),
        }
    }

    /// Dispatch the body to every contact in list order.
    ///
    /// A failure for one contact is recorded and the next contact is tried.
    pub async fn fan_out(&self, contacts: &[EmergencyContact], body: &str) -> FanOutReport {
        let mut report = FanOutReport {
            attempted: contacts.len(),
            failures: Vec::new(),
        };

        for contact in contacts {
            match self.send_text(&contact.phone_number, body).await {
                Ok(()) => {
                    info!(contact = %contact.name, channel = self.channel.name(), "Alert handed off");
                }
                Err(e) => {
                    warn!(contact = %contact.name, "Failed to dispatch alert: {}", e);
                    report.failures.push(DispatchFailure {
                        contact_name: contact.name.clone(),
                        error: e,
                    });
                }
            }
        }

        report
    }

    /// Name of the underlying channel.
    pub fn channel_name(&self) -> &str {
        self.channel.name()
    }
}

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
