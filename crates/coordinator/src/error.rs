//! Error types for coordinator handles.

use thiserror::Error;

/// Errors returned by a [`CoordinatorHandle`](crate::CoordinatorHandle).
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The coordinator task has stopped; no further commands are accepted.
    #[error("coordinator is not running")]
    Closed,
}
