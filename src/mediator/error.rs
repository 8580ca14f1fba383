//! Error types for the mediator's infrastructure.
//!
//! Command outcomes are never errors; they are envelopes. These cover wiring only.

use crate::bus::BusError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediatorError {
    /// `start` was called twice on the same service.
    #[error("Mediator handlers are already registered")]
    AlreadyRegistered,

    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    /// A listener task panicked or was aborted.
    #[error("Listener task failed: {0}")]
    Listener(String),
}
