//! JSON envelopes exchanged over the socket.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One message on the wire, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    Request {
        id: String,
        operation: String,
        #[serde(default)]
        params: Value,
    },
    Response {
        id: String,
        #[serde(default)]
        result: Value,
    },
    Error {
        #[serde(default)]
        id: Option<String>,
        error: RemoteError,
    },
    /// Unsolicited notification; all fields besides `type` are kept.
    Event {
        #[serde(flatten)]
        data: Map<String, Value>,
    },
}

impl Envelope {
    pub fn request(id: impl Into<String>, operation: impl Into<String>, params: Value) -> Self {
        Envelope::Request {
            id: id.into(),
            operation: operation.into(),
            params,
        }
    }

    /// Correlation id, if the envelope carries one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Envelope::Request { id, .. } | Envelope::Response { id, .. } => Some(id),
            Envelope::Error { id, .. } => id.as_deref(),
            Envelope::Event { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Value>,
}

/// An event broadcast to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct WsEvent {
    pub data: Map<String, Value>,
}

impl WsEvent {
    /// The `event` field, when the server names its events.
    pub fn name(&self) -> Option<&str> {
        self.data.get("event").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}
