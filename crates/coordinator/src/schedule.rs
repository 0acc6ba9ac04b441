//! Cancellable scheduled tasks owned by the coordinator.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};

/// Timer messages delivered back to the coordinator loop.
///
/// Each carries the epoch it was scheduled in; the loop drops any message
/// whose epoch no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Timer {
    Tick(u64),
    CooldownElapsed(u64),
    DispatchStatusReset(u64),
}

/// Handle to a spawned timer task. Cancelled on drop.
#[derive(Debug)]
pub(crate) struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Send `timer` every `period`, starting one period from now.
    pub(crate) fn repeating(
        period: Duration,
        timer: Timer,
        tx: mpsc::UnboundedSender<Timer>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                if tx.send(timer).is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Send `timer` once after `delay`.
    pub(crate) fn once(delay: Duration, timer: Timer, tx: mpsc::UnboundedSender<Timer>) -> Self {
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(timer);
        });
        Self { handle }
    }

    pub(crate) fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
