//! Error types for adt-objects.

use crate::types::{ActivationMessage, CheckMessage};

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

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// The underlying HTTP-layer error, if this error came from the backend.
    pub fn client_error(&self) -> Option<&abap_adt_client::Error> {
        self.source.as_ref()?.downcast_ref::<abap_adt_client::Error>()
    }

    /// The backend reported that the object does not exist.
    pub fn is_not_found(&self) -> bool {
        self.client_error().is_some_and(|e| e.is_not_found())
    }

    /// The object already exists.
    pub fn is_already_exists(&self) -> bool {
        matches!(self.kind, ErrorKind::AlreadyExists(_))
            || self.client_error().is_some_and(|e| e.is_already_exists())
    }

    /// The backend does not support the operation for this object type.
    pub fn is_not_supported(&self) -> bool {
        self.client_error().is_some_and(|e| e.is_not_supported())
    }

    /// The object is locked by someone else.
    pub fn is_locked(&self) -> bool {
        self.client_error().is_some_and(|e| e.is_locked())
    }

    /// HTTP status of the failed backend call.
    pub fn status(&self) -> Option<u16> {
        self.client_error().and_then(|e| e.status())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Client error: {0}")]
    Client(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Lock failed for {0}")]
    LockFailed(String),
    #[error("Object already exists: {0}")]
    AlreadyExists(String),
    #[error("Check reported {} error(s){}", .messages.len(), first_text(.messages.iter().map(|m| m.text.as_str())))]
    CheckFailed { messages: Vec<CheckMessage> },
    #[error("Activation failed with {} error(s){}", .messages.len(), first_text(.messages.iter().map(|m| m.text.as_str())))]
    ActivationFailed { messages: Vec<ActivationMessage> },
    #[error("XML parse error: {0}")]
    Parse(String),
    #[error("{0}")]
    Other(String),
}

fn first_text<'a>(mut texts: impl Iterator<Item = &'a str>) -> String {
    texts
        .next()
        .map(|text| format!(": {text}"))
        .unwrap_or_default()
}

impl From<abap_adt_client::Error> for Error {
    fn from(err: abap_adt_client::Error) -> Self {
        Error {
            kind: ErrorKind::Client(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use abap_adt_client::ErrorKind as ClientKind;

    fn client(kind: ClientKind) -> Error {
        abap_adt_client::Error::new(kind).into()
    }

    #[test]
    fn test_predicates_forward_to_client_error() {
        let err = client(ClientKind::NotFound("zcl_x".into()));
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));

        let err = client(ClientKind::Adt {
            status: 400,
            exception_type: "ExceptionResourceAlreadyExists".into(),
            message: "exists".into(),
        });
        assert!(err.is_already_exists());
        assert!(!err.is_not_found());

        let err = client(ClientKind::Adt {
            status: 403,
            exception_type: "ExceptionResourceNoAccess".into(),
            message: "User DEVELOPER is currently editing ZCL_X".into(),
        });
        assert!(err.is_locked());
    }

    #[test]
    fn test_local_errors_have_no_client_source() {
        let err = Error::new(ErrorKind::InvalidConfig("name missing".into()));
        assert!(err.client_error().is_none());
        assert!(!err.is_not_found());
        assert_eq!(err.status(), None);
        assert!(Error::new(ErrorKind::AlreadyExists("ZX".into())).is_already_exists());
    }

    #[test]
    fn test_check_failed_display() {
        let err = ErrorKind::CheckFailed {
            messages: vec![CheckMessage {
                uri: String::new(),
                line: Some(3),
                column: Some(0),
                severity: Severity::Error,
                text: "Statement is not accessible".into(),
                category: None,
            }],
        };
        assert_eq!(
            err.to_string(),
            "Check reported 1 error(s): Statement is not accessible"
        );
        assert_eq!(
            ErrorKind::ActivationFailed { messages: vec![] }.to_string(),
            "Activation failed with 0 error(s)"
        );
    }
}
