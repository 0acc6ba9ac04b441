//! Collaborator traits consumed by the alert core.
//!
//! Implementations live outside the core (SMS, audio, storage, haptics); the
//! core only sees these seams. All traits are object-safe so they can be held
//! as `Arc<dyn ...>`.

use std::path::Path;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::Location;

/// Independent storage namespaces. No blob references another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Contacts,
    History,
    Profile,
    Templates,
    Messages,
}

impl Namespace {
    pub const ALL: [Namespace; 5] = [
        Namespace::Contacts,
        Namespace::History,
        Namespace::Profile,
        Namespace::Templates,
        Namespace::Messages,
    ];

    /// Storage key for this namespace.
    pub fn key(&self) -> &'static str {
        match self {
            Namespace::Contacts => "emergencyContacts",
            Namespace::History => "emergencyHistory",
            Namespace::Profile => "userProfile",
            Namespace::Templates => "messageTemplates",
            Namespace::Messages => "messageHistory",
        }
    }
}

/// Key/blob storage for the persisted collections.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Store a blob under the namespace, replacing any previous value.
    async fn save(&self, namespace: Namespace, bytes: &[u8]) -> Result<(), CoreError>;

    /// Load the blob for a namespace.
    ///
    /// Backend failures are reported as `None`; callers treat absent and
    /// unreadable data the same way.
    async fn load(&self, namespace: Namespace) -> Option<Vec<u8>>;
}

/// An outgoing channel that accepts a message for one phone number.
///
/// Success means the message was handed off, not that it was delivered.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn dispatch(&self, phone_number: &str, body: &str) -> Result<(), CoreError>;

    /// Get a human-readable name for this channel.
    fn name(&self) -> &str;
}

/// An audio capture device that can open a session writing to a file.
pub trait CaptureDevice: Send + Sync {
    fn open_for_write(&self, path: &Path) -> Result<Box<dyn CaptureSession>, CoreError>;
}

/// An open capture session.
pub trait CaptureSession: Send {
    fn record(&mut self) -> Result<(), CoreError>;
    fn stop(&mut self) -> Result<(), CoreError>;
}

/// Fire-and-forget attention signal, e.g. a haptic buzz.
pub trait AttentionCue: Send + Sync {
    fn signal(&self);
}

/// A cue that does nothing. Useful on hosts without haptics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCue;

impl AttentionCue for SilentCue {
    fn signal(&self) {}
}

/// Supplies the current location on demand, if a fix is available.
pub trait LocationProvider: Send + Sync {
    fn current_location(&self) -> Option<Location>;
}

/// A provider that always returns the same snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Location>);

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> Option<Location> {
        self.0
    }
}
