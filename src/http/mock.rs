//! # Mock HTTP Client
//!
//! A scripted [`HttpClient`] for testing the mediator without a network.
//!
//! Expectations are matched by method and URL (first unused match wins), so tests
//! that fire several commands concurrently do not depend on arrival order.
//!
//! ```ignore
//! let http = Arc::new(MockHttpClient::new());
//! http.expect_get("http://localhost/api/notes").return_envelope(Envelope::ok(items));
//! http.expect_post("http://localhost/api/notes").return_err(TransportError::Timeout);
//!
//! // ... drive the mediator ...
//!
//! http.verify(); // Ensures all expectations were met
//! ```

use super::{HttpClient, TransportError, TransportResult};
use crate::model::{Envelope, RawEnvelope};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A request the mock has received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

struct Expectation {
    method: Method,
    url: String,
    delay: Option<Duration>,
    response: TransportResult,
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// Scripted [`HttpClient`] with expectation tracking.
#[derive(Default)]
pub struct MockHttpClient {
    expectations: Expectations,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_get(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Get, url)
    }

    pub fn expect_post(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Post, url)
    }

    pub fn expect_put(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Put, url)
    }

    pub fn expect_delete(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Delete, url)
    }

    fn expect(&self, method: Method, url: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            url: url.into(),
            delay: None,
            expectations: self.expectations.clone(),
        }
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            let pending: Vec<String> = exps.iter().map(|e| format!("{} {}", e.method, e.url)).collect();
            panic!("Not all expectations were met. Remaining: {pending:?}");
        }
    }

    async fn respond(&self, method: Method, url: &str, body: Option<&Value>) -> TransportResult {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });

        let expectation = {
            let mut exps = self.expectations.lock().unwrap();
            let position = exps
                .iter()
                .position(|e| e.method == method && e.url == url)
                .unwrap_or_else(|| panic!("Unexpected request: {method} {url}"));
            exps.remove(position).unwrap()
        };

        if let Some(delay) = expectation.delay {
            tokio::time::sleep(delay).await;
        }
        expectation.response
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str) -> TransportResult {
        self.respond(Method::Get, url, None).await
    }

    async fn post(&self, url: &str, body: &Value) -> TransportResult {
        self.respond(Method::Post, url, Some(body)).await
    }

    async fn put(&self, url: &str, body: &Value) -> TransportResult {
        self.respond(Method::Put, url, Some(body)).await
    }

    async fn delete(&self, url: &str) -> TransportResult {
        self.respond(Method::Delete, url, None).await
    }
}

/// Builder for a single expectation.
pub struct ExpectationBuilder {
    method: Method,
    url: String,
    delay: Option<Duration>,
    expectations: Expectations,
}

impl ExpectationBuilder {
    /// Holds the response back for `delay` before answering.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answers with a body exactly as given (fields may be missing).
    pub fn return_ok(self, raw: RawEnvelope) {
        self.push(Ok(Some(raw)));
    }

    pub fn return_envelope(self, envelope: Envelope) {
        self.push(Ok(Some(envelope.into())));
    }

    /// Answers with an absent body.
    pub fn return_none(self) {
        self.push(Ok(None));
    }

    pub fn return_err(self, error: TransportError) {
        self.push(Err(error));
    }

    fn push(self, response: TransportResult) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            method: self.method,
            url: self.url,
            delay: self.delay,
            response,
        });
    }
}
