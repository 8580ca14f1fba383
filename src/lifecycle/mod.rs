//! Runtime orchestration and lifecycle management.
//!
//! - [`CrudSystem`]: spins up the bus and the mediator, and shuts them down in order.
//! - [`Settings`]: configuration from defaults, a TOML file and environment variables.
//! - [`setup_tracing`]: initializes the tracing subscriber.

pub mod config;
pub mod crud_system;
pub mod error;
pub mod tracing;

pub use self::config::*;
pub use self::crud_system::*;
pub use self::error::*;
pub use self::tracing::setup_tracing;
