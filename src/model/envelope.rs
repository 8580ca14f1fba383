use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Message used when a transport failure carries no description.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Lifecycle marker carried by every [`Envelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Fresh, empty data set (produced by the `New` command).
    Init,
    Ok,
    Error,
    /// Any other status the remote service sends. Publishes no terminal event.
    #[serde(other)]
    Other,
}

/// The normalized `{status, items}` result shape.
///
/// Success and failure use the same shape. A failed request is an `Error` envelope
/// whose items describe what went wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: Status,
    pub items: Vec<Value>,
}

impl Envelope {
    pub fn new(status: Status, items: Vec<Value>) -> Self {
        Self { status, items }
    }

    /// `{init, []}`
    pub fn init() -> Self {
        Self::new(Status::Init, Vec::new())
    }

    pub fn ok(items: Vec<Value>) -> Self {
        Self::new(Status::Ok, items)
    }

    /// `{error, []}`: used for rejected inputs and absent results.
    pub fn empty_error() -> Self {
        Self::new(Status::Error, Vec::new())
    }

    /// `{error, [{"message": ...}]}`: used for transport failures.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(Status::Error, vec![json!({ "message": message.into() })])
    }

    /// Fills in the defaults for a response as the remote service sent it.
    ///
    /// An absent response becomes `{error, []}`. A missing `status` becomes `ok`
    /// and missing `items` become an empty list.
    pub fn normalize(raw: Option<RawEnvelope>) -> Self {
        match raw {
            None => Self::empty_error(),
            Some(raw) => Self {
                status: raw.status.unwrap_or(Status::Ok),
                items: raw.items.unwrap_or_default(),
            },
        }
    }
}

/// A response body exactly as the remote service sent it. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEnvelope {
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub items: Option<Vec<Value>>,
}

impl From<Envelope> for RawEnvelope {
    fn from(envelope: Envelope) -> Self {
        Self {
            status: Some(envelope.status),
            items: Some(envelope.items),
        }
    }
}
