//! The coordinator loop: single owner of all alert state.

use std::sync::Arc;

use broadcaster::{AlertComposer, Broadcaster, MedicalContext};
use chrono::Utc;
use database::{ContactStore, HistoryLog};
use raksha_core::{AttentionCue, EmergencyEvent, Location};
use recorder::RecordingController;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::config::CoordinatorConfig;
use crate::handle::CoordinatorHandle;
use crate::schedule::{ScheduledTask, Timer};
use crate::state::{
    sent_status, CoordinatorEvent, CoordinatorSnapshot, CoordinatorState, STATUS_NO_CONTACTS,
    STATUS_READY,
};

/// Requests sent from handles to the coordinator loop.
#[derive(Debug)]
pub(crate) enum Command {
    Arm {
        location: Option<Location>,
        reply: oneshot::Sender<bool>,
    },
    Shake {
        location: Option<Location>,
        reply: oneshot::Sender<bool>,
    },
    Cancel {
        reply: oneshot::Sender<bool>,
    },
    Fire {
        location: Option<Location>,
        reply: oneshot::Sender<bool>,
    },
    SetShakeToSos(bool),
    SetMedicalContext(Option<MedicalContext>),
    StopRecording {
        reply: oneshot::Sender<()>,
    },
    Shutdown,
}

/// Collaborators the coordinator drives.
#[derive(Clone)]
pub struct CoordinatorParts {
    pub contacts: Arc<ContactStore>,
    pub history: Arc<HistoryLog>,
    pub broadcaster: Broadcaster,
    pub recorder: Arc<RecordingController>,
    pub cue: Arc<dyn AttentionCue>,
}

/// Runs the countdown → fire → cooldown protocol.
///
/// All transitions happen on one task. Public operations reach it through a
/// [`CoordinatorHandle`], so no two transitions ever interleave.
pub struct Coordinator {
    parts: CoordinatorParts,
    config: CoordinatorConfig,
    composer: AlertComposer,

    state: CoordinatorState,
    armed_location: Option<Location>,
    shake_to_sos_enabled: bool,
    dispatch_status: String,

    /// Bumped whenever a countdown or fire begins; stale timers are ignored.
    epoch: u64,
    status_epoch: u64,
    ticker: Option<ScheduledTask>,
    cooldown: Option<ScheduledTask>,
    status_reset: Option<ScheduledTask>,

    timers_tx: mpsc::UnboundedSender<Timer>,
    timers_rx: mpsc::UnboundedReceiver<Timer>,
    snapshot_tx: watch::Sender<CoordinatorSnapshot>,
    events_tx: broadcast::Sender<CoordinatorEvent>,
}

impl Coordinator {
    pub fn new(parts: CoordinatorParts, config: CoordinatorConfig) -> Self {
        let (timers_tx, timers_rx) = mpsc::unbounded_channel();
        let (events_tx, _) = broadcast::channel(config.event_capacity.max(1));
        let initial = CoordinatorSnapshot {
            state: CoordinatorState::Idle,
            countdown: config.countdown_secs,
            alert_active: false,
            dispatch_status: STATUS_READY.to_string(),
            is_recording: parts.recorder.is_recording(),
            shake_to_sos_enabled: config.shake_to_sos_enabled,
        };
        let (snapshot_tx, _) = watch::channel(initial);

        Self {
            shake_to_sos_enabled: config.shake_to_sos_enabled,
            parts,
            config,
            composer: AlertComposer::new(),
            state: CoordinatorState::Idle,
            armed_location: None,
            dispatch_status: STATUS_READY.to_string(),
            epoch: 0,
            status_epoch: 0,
            ticker: None,
            cooldown: None,
            status_reset: None,
            timers_tx,
            timers_rx,
            snapshot_tx,
            events_tx,
        }
    }

    /// Start the coordinator on the current Tokio runtime.
    pub fn spawn(self) -> CoordinatorHandle {
        let (commands_tx, commands_rx) = mpsc::channel(self.config.command_capacity.max(1));
        let handle = CoordinatorHandle::new(
            commands_tx,
            self.snapshot_tx.subscribe(),
            self.events_tx.clone(),
        );
        tokio::spawn(self.run(commands_rx));
        handle
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        info!(
            countdown_secs = self.config.countdown_secs,
            channel = self.parts.broadcaster.channel_name(),
            "Coordinator started"
        );

        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command).await,
                },

                Some(timer) = self.timers_rx.recv() => self.handle_timer(timer).await,
            }
        }

        self.ticker.take();
        self.cooldown.take();
        self.status_reset.take();
        info!("Coordinator stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Arm { location, reply } => {
                let _ = reply.send(self.arm(location));
            }
            Command::Shake { location, reply } => {
                let armed = if self.shake_to_sos_enabled {
                    self.arm(location)
                } else {
                    debug!("Shake ignored: shake-to-SOS disabled");
                    false
                };
                let _ = reply.send(armed);
            }
            Command::Cancel { reply } => {
                let _ = reply.send(self.cancel());
            }
            Command::Fire { location, reply } => {
                let _ = reply.send(self.legacy_fire(location).await);
            }
            Command::SetShakeToSos(enabled) => {
                self.shake_to_sos_enabled = enabled;
                self.publish();
            }
            Command::SetMedicalContext(medical) => {
                self.composer.set_medical_context(medical);
            }
            Command::StopRecording { reply } => {
                self.parts.recorder.stop();
                self.publish();
                let _ = reply.send(());
            }
            Command::Shutdown => {}
        }
    }

    async fn handle_timer(&mut self, timer: Timer) {
        match timer {
            Timer::Tick(epoch) => {
                // A tick queued before a cancel or re-arm must not apply.
                let CoordinatorState::CountingDown { remaining } = self.state else {
                    return;
                };
                if epoch != self.epoch {
                    return;
                }
                let remaining = remaining.saturating_sub(1);
                debug!(remaining, "Countdown tick");
                self.transition(CoordinatorState::CountingDown { remaining });
                if remaining == 0 {
                    let location = self.armed_location.take();
                    self.perform_fire_sequence(location).await;
                }
            }
            Timer::CooldownElapsed(epoch) => {
                if self.state == CoordinatorState::Cooldown && epoch == self.epoch {
                    self.cooldown = None;
                    self.transition(CoordinatorState::Idle);
                }
            }
            Timer::DispatchStatusReset(epoch) => {
                if epoch == self.status_epoch {
                    self.status_reset = None;
                    self.dispatch_status = STATUS_READY.to_string();
                    self.publish();
                }
            }
        }
    }

    /// Idle → CountingDown. Any other state is left untouched.
    fn arm(&mut self, location: Option<Location>) -> bool {
        if self.state != CoordinatorState::Idle {
            debug!(state = self.state.name(), "Arm ignored");
            return false;
        }

        self.armed_location = location;
        self.parts.cue.signal();
        self.epoch += 1;

        info!(
            countdown_secs = self.config.countdown_secs,
            has_location = location.is_some(),
            "SOS countdown armed"
        );
        self.transition(CoordinatorState::CountingDown {
            remaining: self.config.countdown_secs,
        });

        self.ticker = Some(ScheduledTask::repeating(
            self.config.tick_interval,
            Timer::Tick(self.epoch),
            self.timers_tx.clone(),
        ));
        true
    }

    /// CountingDown → Idle with nothing applied.
    fn cancel(&mut self) -> bool {
        if !self.state.is_counting_down() {
            debug!(state = self.state.name(), "Cancel ignored");
            return false;
        }

        self.stop_ticker();
        self.armed_location = None;
        info!("SOS countdown cancelled");
        self.transition(CoordinatorState::Idle);
        true
    }

    /// Fire without waiting for the countdown.
    async fn legacy_fire(&mut self, location: Option<Location>) -> bool {
        match self.state {
            CoordinatorState::Idle => {
                self.parts.cue.signal();
                self.epoch += 1;
            }
            CoordinatorState::CountingDown { .. } => {
                self.stop_ticker();
                self.armed_location = None;
            }
            CoordinatorState::Firing | CoordinatorState::Cooldown => {
                debug!(state = self.state.name(), "Fire ignored");
                return false;
            }
        }

        info!("Immediate SOS trigger");
        self.perform_fire_sequence(location).await;
        true
    }

    /// The one fire path shared by countdown expiry and immediate triggers.
    async fn perform_fire_sequence(&mut self, location: Option<Location>) {
        self.stop_ticker();
        self.transition(CoordinatorState::Firing);

        let now = Utc::now();
        let body = self.composer.compose(location.as_ref(), now);

        let contacts = self.parts.contacts.list().await;
        let (dispatched, failed) = if contacts.is_empty() {
            warn!("Alert fired with no emergency contacts configured");
            self.set_dispatch_status(STATUS_NO_CONTACTS.to_string());
            (0, 0)
        } else {
            let report = self.parts.broadcaster.fan_out(&contacts, &body).await;
            self.set_dispatch_status(sent_status(contacts.len()));
            (report.dispatched(), report.failures.len())
        };

        if !self.parts.recorder.is_recording() {
            let status = self.parts.recorder.start();
            info!(status = status.label(), "Evidence recording");
        }

        let event = EmergencyEvent::new(now, location, contacts.len());
        self.parts.history.record(event.clone()).await;

        info!(
            contacts = contacts.len(),
            dispatched,
            failed,
            "SOS alert fired"
        );
        let _ = self.events_tx.send(CoordinatorEvent::Fired {
            event,
            dispatched,
            failed,
        });

        self.transition(CoordinatorState::Cooldown);
        self.cooldown = Some(ScheduledTask::once(
            self.config.cooldown,
            Timer::CooldownElapsed(self.epoch),
            self.timers_tx.clone(),
        ));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    fn set_dispatch_status(&mut self, status: String) {
        self.dispatch_status = status;
        self.status_epoch += 1;
        self.status_reset = Some(ScheduledTask::once(
            self.config.dispatch_status_reset,
            Timer::DispatchStatusReset(self.status_epoch),
            self.timers_tx.clone(),
        ));
    }

    fn transition(&mut self, state: CoordinatorState) {
        if !matches!(state, CoordinatorState::CountingDown { .. }) {
            info!(from = self.state.name(), to = state.name(), "Coordinator transition");
        }
        self.state = state;
        let _ = self.events_tx.send(CoordinatorEvent::StateChanged(state));
        self.publish();
    }

    fn publish(&self) {
        let countdown = match self.state {
            CoordinatorState::CountingDown { remaining } => remaining,
            _ => self.config.countdown_secs,
        };
        self.snapshot_tx.send_replace(CoordinatorSnapshot {
            state: self.state,
            countdown,
            alert_active: matches!(
                self.state,
                CoordinatorState::Firing | CoordinatorState::Cooldown
            ),
            dispatch_status: self.dispatch_status.clone(),
            is_recording: self.parts.recorder.is_recording(),
            shake_to_sos_enabled: self.shake_to_sos_enabled,
        });
    }
}
