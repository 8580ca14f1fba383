//! Outbound network collaborators.
//!
//! - [`HttpClient`]: the four verbs the mediator needs, answering with a
//!   [`RawEnvelope`](crate::model::RawEnvelope) (or nothing).
//! - [`RestClient`]: the `reqwest` implementation.
//! - [`UrlBuilder`] / [`TemplateUrlBuilder`]: turn an endpoint template and the
//!   command parameters into a URL.
//!
//! See [`mock`] for a scripted client used in tests.

pub mod client;
pub mod error;
pub mod mock;
pub mod url_builder;

pub use client::*;
pub use error::*;
pub use url_builder::*;
