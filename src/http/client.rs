//! # HTTP Client
//!
//! [`HttpClient`] is the seam between the mediator and the network. Every call resolves
//! to `Ok(Some(raw))` for a decoded body, `Ok(None)` for an absent one, or a
//! [`TransportError`].

use super::TransportError;
use crate::model::RawEnvelope;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Result of one remote call.
pub type TransportResult = Result<Option<RawEnvelope>, TransportError>;

/// HTTP-capable collaborator. URLs arrive fully built.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> TransportResult;

    async fn post(&self, url: &str, body: &Value) -> TransportResult;

    async fn put(&self, url: &str, body: &Value) -> TransportResult;

    async fn delete(&self, url: &str) -> TransportResult;
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    async fn get(&self, url: &str) -> TransportResult {
        (**self).get(url).await
    }

    async fn post(&self, url: &str, body: &Value) -> TransportResult {
        (**self).post(url, body).await
    }

    async fn put(&self, url: &str, body: &Value) -> TransportResult {
        (**self).put(url, body).await
    }

    async fn delete(&self, url: &str) -> TransportResult {
        (**self).delete(url).await
    }
}

/// [`HttpClient`] backed by `reqwest`.
///
/// Non-2xx answers become [`TransportError::Status`]. An empty or `null` body is an
/// absent result.
#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
}

impl RestClient {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wraps an already configured `reqwest` client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> TransportResult {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Rejected");
            return Err(TransportError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        decode_body(&body)
    }
}

#[async_trait]
impl HttpClient for RestClient {
    #[instrument(skip(self))]
    async fn get(&self, url: &str) -> TransportResult {
        self.send(self.client.get(url)).await
    }

    #[instrument(skip(self, body))]
    async fn post(&self, url: &str, body: &Value) -> TransportResult {
        self.send(self.client.post(url).json(body)).await
    }

    #[instrument(skip(self, body))]
    async fn put(&self, url: &str, body: &Value) -> TransportResult {
        self.send(self.client.put(url).json(body)).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, url: &str) -> TransportResult {
        self.send(self.client.delete(url)).await
    }
}

/// Decodes a response body. Blank and `null` bodies are absent results.
pub fn decode_body(body: &[u8]) -> TransportResult {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<Option<RawEnvelope>>(body)
        .map_err(|e| TransportError::Decode(e.to_string()))
}
