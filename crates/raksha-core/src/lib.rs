//! Core types and collaborator traits for the Raksha emergency alert system.
//!
//! This crate provides the shared vocabulary for every other crate in the
//! workspace. It defines:
//!
//! - [`EmergencyContact`] / [`EmergencyEvent`] / [`Location`] - alert domain types
//! - [`UserProfile`] - the per-session profile record
//! - [`MessageTemplate`] / [`MessageHistoryEntry`] - reusable messaging types
//! - [`Persistence`], [`NotificationChannel`], [`CaptureDevice`], [`AttentionCue`],
//!   [`LocationProvider`] - the collaborator seams the core consumes
//! - [`CoreError`] - errors raised by collaborator implementations
//!
//! # Example
//!
//! ```rust
//! use raksha_core::{async_trait, CoreError, NotificationChannel};
//!
//! struct PrintChannel;
//!
//! #[async_trait]
//! impl NotificationChannel for PrintChannel {
//!     async fn dispatch(&self, phone_number: &str, body: &str) -> Result<(), CoreError> {
//!         println!("{phone_number}: {body}");
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "PrintChannel"
//!     }
//! }
//! ```

mod collaborators;
mod error;
mod messaging;
mod profile;
mod types;

pub use collaborators::{
    AttentionCue, CaptureDevice, CaptureSession, FixedLocation, LocationProvider, Namespace,
    NotificationChannel, Persistence, SilentCue,
};
pub use error::CoreError;
pub use messaging::{MessageHistoryEntry, MessageKind, MessageTemplate};
pub use profile::{validate_age, BloodType, Gender, UserProfile, ValidationError, MAX_AGE, MIN_AGE};
pub use types::{EmergencyContact, EmergencyEvent, Location};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
