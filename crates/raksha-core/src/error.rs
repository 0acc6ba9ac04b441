//! Error types for collaborator implementations.

use thiserror::Error;

/// Errors raised by collaborators at the edges of the core.
///
/// None of these are fatal: every component that calls a collaborator
/// absorbs the error at its own boundary and degrades to a defined state.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A persistence backend could not store a blob.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// An outgoing notification could not be handed to its channel.
    #[error("dispatch failed: {0}")]
    Dispatch(String),

    /// The capture device could not be opened or driven.
    #[error("capture failed: {0}")]
    Capture(String),
}
