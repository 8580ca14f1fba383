//! Error types for the network collaborators.

use thiserror::Error;

/// Errors raised while turning an endpoint template into a URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlError {
    /// A `:name` placeholder had no matching parameter.
    #[error("missing url parameter: {0}")]
    MissingParam(String),

    #[error("invalid url: {0}")]
    Parse(String),
}

/// Errors raised by an [`HttpClient`](super::HttpClient) call.
///
/// The mediator never propagates these. It turns them into an `error` envelope whose
/// single item carries [`TransportError::description`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("timeout")]
    Timeout,

    /// Connection-level failure (DNS, refused, reset, ...).
    #[error("{0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("unexpected status {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error(transparent)]
    InvalidUrl(#[from] UrlError),

    /// A failure that carries no description.
    #[error("Unknown error")]
    Unknown,
}

impl TransportError {
    /// Human readable description, if the failure has one.
    pub fn description(&self) -> Option<String> {
        match self {
            TransportError::Unknown => None,
            TransportError::Network(message) if message.trim().is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if let Some(status) = e.status() {
            TransportError::Status(status.as_u16())
        } else if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description() {
        assert_eq!(TransportError::Timeout.description().as_deref(), Some("timeout"));
        assert_eq!(
            TransportError::Status(503).description().as_deref(),
            Some("unexpected status 503")
        );
        assert_eq!(
            TransportError::from(UrlError::MissingParam("id".into()))
                .description()
                .as_deref(),
            Some("missing url parameter: id")
        );
        assert_eq!(TransportError::Unknown.description(), None);
        assert_eq!(TransportError::Network("  ".into()).description(), None);
    }
}
