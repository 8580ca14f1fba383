//! The mediator between the bus and the remote resource API.
//!
//! [`StoreCrudService`] turns each inbound command into at most one HTTP call and
//! reports the outcome twice: once through published [`Event`](crate::model::Event)s
//! and once as the returned [`Envelope`](crate::model::Envelope).

pub mod crud;
pub mod error;
pub mod service;

pub use crud::*;
pub use error::*;
pub use service::*;
