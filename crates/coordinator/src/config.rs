//! Coordinator configuration.

use std::time::Duration;

/// Seconds between arming and firing.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 30;

/// How long the alert stays active after firing.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(3);

/// How long a dispatch status message stays before reverting to "Ready".
pub const DEFAULT_DISPATCH_STATUS_RESET: Duration = Duration::from_secs(5);

/// Configuration for the coordinator.
///
/// The countdown and cooldown are fixed for a session; they are not derived
/// from anything at runtime.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Countdown length in ticks.
    pub countdown_secs: u32,
    /// Period of one countdown tick.
    pub tick_interval: Duration,
    /// Fixed post-fire delay before returning to idle.
    pub cooldown: Duration,
    /// Delay before the dispatch status reverts to "Ready".
    pub dispatch_status_reset: Duration,
    /// Whether a shake gesture arms the countdown.
    pub shake_to_sos_enabled: bool,
    /// Command queue depth.
    pub command_capacity: usize,
    /// Buffered transition events per subscriber.
    pub event_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            tick_interval: Duration::from_secs(1),
            cooldown: DEFAULT_COOLDOWN,
            dispatch_status_reset: DEFAULT_DISPATCH_STATUS_RESET,
            shake_to_sos_enabled: true,
            command_capacity: 32,
            event_capacity: 128,
        }
    }
}
