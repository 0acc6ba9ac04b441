//! File-backed capture device.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use raksha_core::{CaptureDevice, CaptureSession, CoreError};
use tracing::debug;

/// Reserves the capture file on open and finalizes it on stop.
///
/// Hosts with a microphone pipeline supply their own [`CaptureDevice`]; this
/// one lets the rest of the system run where no audio input exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCaptureDevice;

impl CaptureDevice for FileCaptureDevice {
    fn open_for_write(&self, path: &Path) -> Result<Box<dyn CaptureSession>, CoreError> {
        let file = File::create(path)
            .map_err(|e| CoreError::Capture(format!("{}: {}", path.display(), e)))?;
        Ok(Box::new(FileCaptureSession {
            path: path.to_path_buf(),
            file: Some(file),
            started_at: None,
        }))
    }
}

struct FileCaptureSession {
    path: PathBuf,
    file: Option<File>,
    started_at: Option<DateTime<Utc>>,
}

impl CaptureSession for FileCaptureSession {
    fn record(&mut self) -> Result<(), CoreError> {
        if self.file.is_none() {
            return Err(CoreError::Capture("session already closed".to_string()));
        }
        self.started_at = Some(Utc::now());
        debug!(path = %self.path.display(), "Capture started");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CoreError> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        file.flush()
            .and_then(|_| file.sync_all())
            .map_err(|e| CoreError::Capture(e.to_string()))?;
        if let Some(started) = self.started_at {
            let secs = (Utc::now() - started).num_seconds();
            debug!(path = %self.path.display(), secs, "Capture finalized");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_file_and_stops_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emergency_1.m4a");

        let mut session = FileCaptureDevice.open_for_write(&path).unwrap();
        assert!(path.exists());
        session.record().unwrap();
        session.stop().unwrap();
        // Second stop is harmless
        session.stop().unwrap();
        assert!(session.record().is_err());
    }

    #[test]
    fn test_open_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("a.m4a");
        assert!(matches!(
            FileCaptureDevice.open_for_write(&path),
            Err(CoreError::Capture(_))
        ));
    }
}
