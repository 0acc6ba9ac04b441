//! Published coordinator state.

use raksha_core::EmergencyEvent;

/// Where the coordinator is in the arm/fire/reset protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    CountingDown { remaining: u32 },
    Firing,
    Cooldown,
}

impl CoordinatorState {
    pub fn is_counting_down(&self) -> bool {
        matches!(self, CoordinatorState::CountingDown { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            CoordinatorState::Idle => "idle",
            CoordinatorState::CountingDown { .. } => "counting_down",
            CoordinatorState::Firing => "firing",
            CoordinatorState::Cooldown => "cooldown",
        }
    }
}

/// Read-only view published to observers after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorSnapshot {
    pub state: CoordinatorState,
    /// Seconds left while counting down; the nominal length otherwise.
    pub countdown: u32,
    /// Set while firing and during cooldown.
    pub alert_active: bool,
    /// Outcome of the last fan-out, e.g. "SMS sent to 2 contact(s)".
    pub dispatch_status: String,
    pub is_recording: bool,
    pub shake_to_sos_enabled: bool,
}

/// Discrete notifications for observers that need every transition.
#[derive(Debug, Clone)]
pub enum CoordinatorEvent {
    StateChanged(CoordinatorState),
    /// An alert fired. `dispatched` counts channel hand-offs that succeeded.
    Fired {
        event: EmergencyEvent,
        dispatched: usize,
        failed: usize,
    },
}

pub(crate) const STATUS_READY: &str = "Ready";
pub(crate) const STATUS_NO_CONTACTS: &str = "No contacts configured";

pub(crate) fn sent_status(count: usize) -> String {
    format!("SMS sent to {} contact(s)", count)
}
