//! Cloneable front end to a running coordinator.

use broadcaster::MedicalContext;
use raksha_core::Location;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::actor::Command;
use crate::error::CoordinatorError;
use crate::state::{CoordinatorEvent, CoordinatorSnapshot};

/// Sends commands to the coordinator task and observes its state.
///
/// Commands are applied in the order they are received. Each call returns
/// once the coordinator has processed it.
#[derive(Clone)]
pub struct CoordinatorHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<CoordinatorSnapshot>,
    events: broadcast::Sender<CoordinatorEvent>,
}

impl CoordinatorHandle {
    pub(crate) fn new(
        commands: mpsc::Sender<Command>,
        snapshots: watch::Receiver<CoordinatorSnapshot>,
        events: broadcast::Sender<CoordinatorEvent>,
    ) -> Self {
        Self {
            commands,
            snapshots,
            events,
        }
    }

    /// Start the countdown. Returns `false` if the coordinator was not idle.
    pub async fn arm(&self, location: Option<Location>) -> Result<bool, CoordinatorError> {
        self.request(|reply| Command::Arm { location, reply }).await
    }

    /// Cancel a running countdown. Returns `false` if none was running.
    pub async fn cancel(&self) -> Result<bool, CoordinatorError> {
        self.request(|reply| Command::Cancel { reply }).await
    }

    /// Fire immediately, skipping the countdown.
    ///
    /// Only accepted while idle or counting down.
    pub async fn fire(&self, location: Option<Location>) -> Result<bool, CoordinatorError> {
        self.request(|reply| Command::Fire { location, reply }).await
    }

    /// Shake gesture. Arms the countdown when shake-to-SOS is enabled.
    pub async fn on_shake(&self, location: Option<Location>) -> Result<bool, CoordinatorError> {
        self.request(|reply| Command::Shake { location, reply }).await
    }

    pub async fn set_shake_to_sos(&self, enabled: bool) -> Result<(), CoordinatorError> {
        self.send(Command::SetShakeToSos(enabled)).await
    }

    /// Medical details appended to subsequent alerts.
    pub async fn set_medical_context(
        &self,
        medical: Option<MedicalContext>,
    ) -> Result<(), CoordinatorError> {
        self.send(Command::SetMedicalContext(medical)).await
    }

    /// Stop evidence recording started by a fire.
    pub async fn stop_recording(&self) -> Result<(), CoordinatorError> {
        self.request(|reply| Command::StopRecording { reply }).await
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> CoordinatorSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that observes every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorSnapshot> {
        self.snapshots.clone()
    }

    /// Receiver for transition and fire events from now on.
    pub fn events(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.events.subscribe()
    }

    /// Stop the coordinator task. Pending timers are cancelled.
    pub async fn shutdown(&self) -> Result<(), CoordinatorError> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> Result<(), CoordinatorError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| CoordinatorError::Closed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, CoordinatorError> {
        let (reply, response) = oneshot::channel();
        self.send(build(reply)).await?;
        response.await.map_err(|_| CoordinatorError::Closed)
    }
}
