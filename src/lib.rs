//! # Store CRUD
//!
//! > **A bus-to-REST mediator.**
//!
//! Components publish *commands* (new, read, create, update, delete) on a message bus.
//! This crate turns each command into one call against a remote REST resource and
//! publishes the result back as *events*. Success and failure arrive in the same shape,
//! an [`Envelope`](model::Envelope) of `{status, items}`.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Failures are data
//! The mediator never returns an error for a command. A rejected input, a transport
//! failure, an absent body and an error reported by the remote service all become an
//! `error` envelope, published as `DataError` and returned to the caller.
//!
//! ### No ambient bus
//! The bus is an explicit value ([`MixedBus`](bus::MixedBus)) that is created, passed
//! around and dropped like anything else. Nothing registers itself globally.
//!
//! ### Closed message sets
//! [`Command`](model::Command) and [`Event`](model::Event) are enums, so every handler
//! and every subscriber matches them exhaustively.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Ordering
//! For one command, the completion event (`ReadDone`, `CreateDone`, ...) is always
//! published before the terminal `DataChanged` / `DataError`. Concurrent commands are
//! not ordered relative to each other.
//!
//! ### 2. Concurrency Model
//! The [`BusActor`](bus::BusActor) owns command routing and processes requests
//! sequentially. The mediator handles every inbound message in its own Tokio task,
//! which awaits exactly one HTTP call. Nothing is shared between those tasks.
//!
//! ### 3. Observability
//! `tracing` is used throughout. See [`lifecycle::tracing`] for what gets logged.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: envelopes, owners, commands and events.
//! - [`bus`]: the dispatcher and its publish-only handle.
//! - [`http`]: the HTTP and URL collaborators, plus a scripted mock.
//! - [`mediator`]: [`StoreCrudService`](mediator::StoreCrudService) and the
//!   [`Crud`](mediator::Crud) trait.
//! - [`lifecycle`]: settings, tracing setup and [`CrudSystem`](lifecycle::CrudSystem).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! STORE_CRUD__BASE_URL=http://127.0.0.1:8080 RUST_LOG=info cargo run
//! ```

pub mod bus;
pub mod http;
pub mod lifecycle;
pub mod mediator;
pub mod model;
