//! Start/stop state machine for a capture session.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use raksha_core::{CaptureDevice, CaptureSession, CoreError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// How long "Recording saved" stays visible before reverting.
pub const DEFAULT_STATUS_RESET_DELAY: Duration = Duration::from_secs(3);

/// Status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingStatus {
    NotRecording,
    Recording,
    Saved,
    Failed,
}

impl RecordingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RecordingStatus::NotRecording => "Not Recording",
            RecordingStatus::Recording => "Recording…",
            RecordingStatus::Saved => "Recording saved",
            RecordingStatus::Failed => "Recording failed",
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingStatus::Recording)
    }
}

/// Configuration for the recording controller.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Directory new capture files are created in.
    pub recordings_dir: PathBuf,
    /// Delay before "Recording saved" reverts to "Not Recording".
    pub status_reset_delay: Duration,
    /// Extension for capture files, without the dot.
    pub file_extension: String,
}

impl RecorderConfig {
    pub fn new(recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            recordings_dir: recordings_dir.into(),
            status_reset_delay: DEFAULT_STATUS_RESET_DELAY,
            file_extension: "m4a".to_string(),
        }
    }
}

#[derive(Default)]
struct Inner {
    session: Option<Box<dyn CaptureSession>>,
    current_file: Option<PathBuf>,
    reset_task: Option<JoinHandle<()>>,
}

/// Owns at most one capture session at a time.
///
/// `start` and `stop` are idempotent. Timed status resets run on the Tokio
/// runtime, so `stop` must be called from within one.
pub struct RecordingController {
    device: Arc<dyn CaptureDevice>,
    config: RecorderConfig,
    inner: Mutex<Inner>,
    status: watch::Sender<RecordingStatus>,
}

impl RecordingController {
    pub fn new(device: Arc<dyn CaptureDevice>, config: RecorderConfig) -> Self {
        let (status, _) = watch::channel(RecordingStatus::NotRecording);
        Self {
            device,
            config,
            inner: Mutex::new(Inner::default()),
            status,
        }
    }

    /// Begin a capture session to a new timestamped file.
    ///
    /// A no-op while already recording. Device failures only update the status.
    pub fn start(&self) -> RecordingStatus {
        let mut inner = self.lock();
        if inner.session.is_some() {
            return self.status();
        }
        if let Some(task) = inner.reset_task.take() {
            task.abort();
        }

        match self.open_session() {
            Ok((session, path)) => {
                info!(path = %path.display(), "Recording started");
                inner.session = Some(session);
                inner.current_file = Some(path);
                self.publish(RecordingStatus::Recording);
            }
            Err(e) => {
                warn!("Could not start recording: {}", e);
                self.publish(RecordingStatus::Failed);
            }
        }
        self.status()
    }

    /// End the current session and schedule the status reset.
    ///
    /// A no-op while not recording.
    pub fn stop(&self) -> RecordingStatus {
        let mut inner = self.lock();
        let Some(mut session) = inner.session.take() else {
            return self.status();
        };

        if let Err(e) = session.stop() {
            warn!("Capture device reported an error on stop: {}", e);
        }
        info!(
            path = ?inner.current_file.as_ref().map(|p| p.display().to_string()),
            "Recording saved"
        );
        self.publish(RecordingStatus::Saved);

        let status = self.status.clone();
        let delay = self.config.status_reset_delay;
        inner.reset_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            status.send_if_modified(|s| {
                if *s == RecordingStatus::Saved {
                    *s = RecordingStatus::NotRecording;
                    true
                } else {
                    false
                }
            });
        }));

        self.status()
    }

    pub fn status(&self) -> RecordingStatus {
        *self.status.borrow()
    }

    pub fn is_recording(&self) -> bool {
        self.status().is_recording()
    }

    /// Path of the most recently started capture file.
    pub fn current_file(&self) -> Option<PathBuf> {
        self.lock().current_file.clone()
    }

    /// Watch status changes.
    pub fn subscribe(&self) -> watch::Receiver<RecordingStatus> {
        self.status.subscribe()
    }

    fn open_session(&self) -> Result<(Box<dyn CaptureSession>, PathBuf), CoreError> {
        std::fs::create_dir_all(&self.config.recordings_dir)
            .map_err(|e| CoreError::Capture(format!("cannot create recordings dir: {e}")))?;
        let path = unique_path(&self.config.recordings_dir, &self.config.file_extension);
        let mut session = self.device.open_for_write(&path)?;
        if let Err(e) = session.record() {
            // Release the file the device opened.
            if let Err(stop_err) = session.stop() {
                warn!("Capture device reported an error on stop: {}", stop_err);
            }
            return Err(e);
        }
        Ok((session, path))
    }

    fn publish(&self, status: RecordingStatus) {
        self.status.send_replace(status);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave Inner half-updated.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// `emergency_<unix millis>.<ext>`, suffixed if that name is taken.
fn unique_path(dir: &Path, extension: &str) -> PathBuf {
    let stamp = Utc::now().timestamp_millis();
    let mut path = dir.join(format!("emergency_{stamp}.{extension}"));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("emergency_{stamp}_{n}.{extension}"));
        n += 1;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockCaptureDevice;

    fn controller(device: Arc<MockCaptureDevice>, dir: &Path) -> RecordingController {
        RecordingController::new(device, RecorderConfig::new(dir))
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_stop_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let device = Arc::new(MockCaptureDevice::new());
        let recorder = controller(device.clone(), dir.path());

        assert_eq!(recorder.status().label(), "Not Recording");
        assert_eq!(recorder.start(), RecordingStatus::Recording);
        assert_eq!(recorder.status().label(), "Recording…");
        assert!(recorder.is_recording());

        let file = recorder.current_file().unwrap();
        let name = file.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("emergency_") && name.ends_with(".m4a"));

        assert_eq!(recorder.stop(), RecordingStatus::Saved);
        assert_eq!(device.stops(), 1);

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(recorder.status(), RecordingStatus::Saved);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(recorder.status(), RecordingStatus::NotRecording);
    }

    #[tokio::test]
    async fn test_start_twice_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let device = Arc::new(MockCaptureDevice::new());
        let recorder = controller(device.clone(), dir.path());

        recorder.start();
        let first = recorder.current_file();
        recorder.start();
        assert_eq!(device.opens(), 1);
        assert_eq!(recorder.current_file(), first);
    }

    #[tokio::test]
    async fn test_stop_when_idle_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let device = Arc::new(MockCaptureDevice::new());
        let recorder = controller(device.clone(), dir.path());

        assert_eq!(recorder.stop(), RecordingStatus::NotRecording);
        assert_eq!(device.stops(), 0);
    }

    #[tokio::test]
    async fn test_open_failure_sets_failed_status() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = controller(Arc::new(MockCaptureDevice::failing()), dir.path());

        assert_eq!(recorder.start(), RecordingStatus::Failed);
        assert_eq!(recorder.status().label(), "Recording failed");
        assert!(!recorder.is_recording());
        // Nothing to stop
        assert_eq!(recorder.stop(), RecordingStatus::Failed);
    }

    #[tokio::test]
    async fn test_record_failure_stops_opened_session() {
        let dir = tempfile::tempdir().unwrap();
        let device = Arc::new(MockCaptureDevice::failing_record());
        let recorder = controller(device.clone(), dir.path());

        assert_eq!(recorder.start(), RecordingStatus::Failed);
        assert_eq!(device.opens(), 1);
        assert_eq!(device.stops(), 1);
        assert!(recorder.current_file().is_none());
        assert_eq!(recorder.stop(), RecordingStatus::Failed);
        assert_eq!(device.stops(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_pending_reset() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = controller(Arc::new(MockCaptureDevice::new()), dir.path());

        recorder.start();
        recorder.stop();
        tokio::time::sleep(Duration::from_secs(1)).await;
        recorder.start();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(recorder.status(), RecordingStatus::Recording);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = controller(Arc::new(MockCaptureDevice::new()), dir.path());
        let mut rx = recorder.subscribe();

        recorder.start();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), RecordingStatus::Recording);
    }

    #[test]
    fn test_unique_path_avoids_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let first = unique_path(dir.path(), "m4a");
        std::fs::write(&first, b"").unwrap();
        let second = unique_path(dir.path(), "m4a");
        assert_ne!(first, second);
    }
}
