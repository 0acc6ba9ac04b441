//! Emergency alert coordinator.
//!
//! Owns the SOS protocol: an armed countdown that can be cancelled, a single
//! fire sequence (compose, fan out, record, log) and a fixed cooldown before
//! returning to idle. The coordinator runs as one task; callers talk to it
//! through a [`CoordinatorHandle`] and observe it through snapshots and
//! events.
//!
//! ```text
//!   Idle --arm--> CountingDown(30..0) --expiry--> Firing --> Cooldown --3s--> Idle
//!     ^                 |
//!     +-----cancel------+
//! ```

pub mod actor;
pub mod config;
pub mod error;
pub mod handle;
mod schedule;
pub mod state;

pub use actor::{Coordinator, CoordinatorParts};
pub use config::{
    CoordinatorConfig, DEFAULT_COOLDOWN, DEFAULT_COUNTDOWN_SECS, DEFAULT_DISPATCH_STATUS_RESET,
};
pub use error::CoordinatorError;
pub use handle::CoordinatorHandle;
pub use state::{CoordinatorEvent, CoordinatorSnapshot, CoordinatorState};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
