//! Error types for adt-ws.

use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.kind, ErrorKind::ConnectionClosed | ErrorKind::Shutdown)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Request {operation} timed out after {after:?}")]
    Timeout { operation: String, after: Duration },
    #[error("Remote error{}: {message}", .code.as_ref().map(|c| format!(" {c}")).unwrap_or_default())]
    Remote {
        message: String,
        code: Option<serde_json::Value>,
    },
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Client shut down")]
    Shutdown,
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Serialization(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}
