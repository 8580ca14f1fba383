//! Pure data structures that travel over the bus and the wire.
//!
//! - [`Envelope`] / [`RawEnvelope`]: the `{status, items}` result shape.
//! - [`Owner`]: which resource group a message is about, plus its endpoint templates.
//! - [`Command`] / [`CommandFailure`] / [`Inbound`]: what the mediator receives.
//! - [`Event`]: what the mediator publishes.

pub mod command;
pub mod envelope;
pub mod event;
pub mod owner;

pub use command::*;
pub use envelope::*;
pub use event::*;
pub use owner::*;
