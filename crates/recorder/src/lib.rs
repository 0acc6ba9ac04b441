//! Audio evidence recording lifecycle for Raksha.
//!
//! [`RecordingController`] drives a [`CaptureDevice`] through start/stop and
//! publishes a [`RecordingStatus`] that observers can watch. A device that
//! cannot be opened never surfaces as an error to the caller; it only changes
//! the status to [`RecordingStatus::Failed`].

mod controller;
mod file_device;
pub mod testing;

pub use controller::{RecorderConfig, RecordingController, RecordingStatus, DEFAULT_STATUS_RESET_DELAY};
pub use file_device::FileCaptureDevice;

pub use raksha_core::{CaptureDevice, CaptureSession};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
