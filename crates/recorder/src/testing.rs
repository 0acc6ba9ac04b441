//! Capture device double for tests in this and dependent crates.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use raksha_core::{CaptureDevice, CaptureSession, CoreError};

/// Counts opens and stops; can be built to refuse every open or every record.
#[derive(Debug, Default)]
pub struct MockCaptureDevice {
    fail_open: bool,
    fail_record: bool,
    opens: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
}

impl MockCaptureDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device that cannot be opened.
    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    /// A device that opens but cannot start capturing.
    pub fn failing_record() -> Self {
        Self {
            fail_record: true,
            ..Self::default()
        }
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl CaptureDevice for MockCaptureDevice {
    fn open_for_write(&self, path: &Path) -> Result<Box<dyn CaptureSession>, CoreError> {
        if self.fail_open {
            return Err(CoreError::Capture(format!(
                "microphone unavailable for {}",
                path.display()
            )));
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            fail_record: self.fail_record,
            stops: self.stops.clone(),
        }))
    }
}

struct MockSession {
    fail_record: bool,
    stops: Arc<AtomicUsize>,
}

impl CaptureSession for MockSession {
    fn record(&mut self) -> Result<(), CoreError> {
        if self.fail_record {
            return Err(CoreError::Capture("capture did not start".to_string()));
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CoreError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
