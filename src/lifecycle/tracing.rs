//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Bus**: startup, subscriptions, dispatch fan-out and shutdown.
//! - **Mediator**: one span per handled command (with the `owner` field), the request
//!   line at `debug`, failures at `warn` and the finalized status at `info`.
//! - **HTTP**: one span per `RestClient` call carrying the URL.
//!
//! ```bash
//! # Outcomes only
//! RUST_LOG=info cargo run
//!
//! # Request lines and routing detail
//! RUST_LOG=debug cargo run
//!
//! # Every publication, including ones nobody listens to
//! RUST_LOG=store_crud=trace cargo run
//! ```
//!
//! With `RUST_LOG=debug` a read looks like:
//!
//! ```text
//! DEBUG read{owner=notes}: GET url=http://127.0.0.1:8080/api/notes
//! INFO read{owner=notes}: Finalized owner=notes status=Ok items=3
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
