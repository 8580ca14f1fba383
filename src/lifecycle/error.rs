//! Error types for configuration and system wiring.

use crate::bus::BusError;
use crate::http::{TransportError, UrlError};
use crate::mediator::MediatorError;
use thiserror::Error;

/// Errors raised while loading [`Settings`](super::Settings).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Cannot read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config file: {0}")]
    Parse(String),

    /// An environment override that does not parse.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Errors raised while starting or stopping a [`CrudSystem`](super::CrudSystem).
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid base url: {0}")]
    Url(#[from] UrlError),

    #[error("Cannot build http client: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Mediator(#[from] MediatorError),

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error("Bus task failed: {0}")]
    Task(String),
}
