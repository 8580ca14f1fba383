//! Explicitly constructed message bus.
//!
//! The bus has two halves:
//!
//! - **Commands** flow point-to-point. [`MixedBus::subscribe`] registers a handler queue for
//!   one [`CommandKind`](crate::model::CommandKind) and [`MixedBus::dispatch`] routes an
//!   [`Inbound`](crate::model::Inbound) message to every queue registered for its kind.
//!   Routing is owned by a [`BusActor`] running in its own task.
//! - **Events** fan out over a broadcast channel. [`Publisher::publish`] is fire-and-forget.
//!
//! # Testing
//!
//! See [`mock`] for an event recorder used in assertions.

pub mod core;
pub mod error;
pub mod mock;

pub use self::core::*;
pub use self::error::*;
