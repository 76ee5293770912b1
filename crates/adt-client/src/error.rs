//! Error types for adt-client.

use std::time::Duration;

/// Result type alias for adt-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for adt-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Returns true if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.kind, ErrorKind::RateLimited { .. })
    }

    /// Returns true if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication(_))
    }

    /// Returns the retry-after duration if this is a rate limit error.
    pub fn retry_after(&self) -> Option<Duration> {
        match &self.kind {
            ErrorKind::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Http { status, .. } | ErrorKind::Adt { status, .. } => Some(*status),
            ErrorKind::Authentication(_) => Some(401),
            ErrorKind::Authorization(_) => Some(403),
            ErrorKind::NotFound(_) => Some(404),
            ErrorKind::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Returns true if the backend reported that the object does not exist.
    pub fn is_not_found(&self) -> bool {
        match &self.kind {
            ErrorKind::NotFound(_) => true,
            ErrorKind::Adt {
                status,
                exception_type,
                ..
            } => *status == 404 || exception_type.contains("NotFound"),
            ErrorKind::Http { status, .. } => *status == 404,
            _ => false,
        }
    }

    /// Returns true if the backend rejected a create because the object exists.
    pub fn is_already_exists(&self) -> bool {
        match &self.kind {
            ErrorKind::Adt {
                exception_type,
                message,
                ..
            } => {
                exception_type.contains("AlreadyExist")
                    || message.to_lowercase().contains("already exist")
            }
            ErrorKind::Http { status, message } => {
                *status == 400 && message.to_lowercase().contains("already exist")
            }
            _ => false,
        }
    }

    /// Returns true if the backend does not support the requested operation
    /// for this object type (e.g. a check reporter that does not apply).
    pub fn is_not_supported(&self) -> bool {
        match &self.kind {
            ErrorKind::Adt {
                exception_type,
                message,
                ..
            } => {
                exception_type.contains("NotSupported")
                    || message.to_lowercase().contains("not supported")
            }
            ErrorKind::Http { status, message } => {
                matches!(*status, 400 | 405 | 501)
                    && message.to_lowercase().contains("not supported")
            }
            _ => false,
        }
    }

    /// Returns true if the object is locked by another user or session.
    pub fn is_locked(&self) -> bool {
        let message = match &self.kind {
            ErrorKind::Adt { message, .. }
            | ErrorKind::Http { message, .. }
            | ErrorKind::Authorization(message) => message.to_lowercase(),
            _ => return false,
        };
        message.contains("locked by") || message.contains("currently editing")
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// HTTP request failed.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// Structured ADT exception (`exc:exception` body).
    #[error("ADT error ({status}): {exception_type} - {message}")]
    Adt {
        status: u16,
        exception_type: String,
        message: String,
    },

    /// Rate limit exceeded (HTTP 429).
    #[error("Rate limited{}", retry_after.map(|d| format!(", retry after {:?}", d)).unwrap_or_default())]
    RateLimited { retry_after: Option<Duration> },

    /// Authentication error (HTTP 401).
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Authorization error (HTTP 403).
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// CSRF token could not be obtained or was rejected twice.
    #[error("CSRF token error: {0}")]
    Csrf(String),

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// XML could not be parsed.
    #[error("XML error: {0}")]
    Xml(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Caller supplied an invalid value (object name, handle, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// All retries exhausted.
    #[error("All {attempts} retry attempts exhausted")]
    RetriesExhausted { attempts: u32 },

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ErrorKind {
    /// Returns true if this error kind is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::RateLimited { .. } => true,
            ErrorKind::Timeout => true,
            ErrorKind::Connection(_) => true,
            ErrorKind::Http { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is typically retryable.
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 502 | 503 | 504)
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ErrorKind::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::with_source(ErrorKind::Xml(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adt(status: u16, exception_type: &str, message: &str) -> Error {
        Error::new(ErrorKind::Adt {
            status,
            exception_type: exception_type.to_string(),
            message: message.to_string(),
        })
    }

    #[test]
    fn test_error_is_retryable() {
        let err = Error::new(ErrorKind::RateLimited { retry_after: None });
        assert!(err.is_retryable());

        let err = Error::new(ErrorKind::Timeout);
        assert!(err.is_retryable());

        let err = Error::new(ErrorKind::Http {
            status: 503,
            message: "Service unavailable".to_string(),
        });
        assert!(err.is_retryable());

        let err = Error::new(ErrorKind::NotFound("resource".to_string()));
        assert!(!err.is_retryable());

        let err = adt(400, "ExceptionResourceAlreadyExists", "exists");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_not_found_detection() {
        assert!(Error::new(ErrorKind::NotFound("zcl_x".into())).is_not_found());
        assert!(adt(404, "ExceptionResourceNotFound", "Class ZCL_X not found").is_not_found());
        assert!(Error::new(ErrorKind::Http {
            status: 404,
            message: String::new()
        })
        .is_not_found());
        assert!(!adt(400, "ExceptionResourceAlreadyExists", "x").is_not_found());
    }

    #[test]
    fn test_already_exists_detection() {
        assert!(adt(400, "ExceptionResourceAlreadyExists", "anything").is_already_exists());
        assert!(adt(400, "ExceptionResourceCreationFailure", "Resource ZCL_X does already exist")
            .is_already_exists());
        assert!(Error::new(ErrorKind::Http {
            status: 400,
            message: "Object ZDTEL already exists".into()
        })
        .is_already_exists());
        assert!(!adt(400, "ExceptionInvalidData", "Name too long").is_already_exists());
    }

    #[test]
    fn test_not_supported_detection() {
        assert!(adt(400, "ExceptionNotSupported", "").is_not_supported());
        assert!(adt(400, "Other", "Check for object type SRVD is not supported").is_not_supported());
        assert!(!adt(400, "Other", "syntax error").is_not_supported());
    }

    #[test]
    fn test_locked_detection() {
        assert!(adt(403, "ExceptionResourceNoAccess", "User DEVELOPER is currently editing ZCL_X")
            .is_locked());
        assert!(Error::new(ErrorKind::Authorization("Object is locked by USER2".into())).is_locked());
        assert!(!Error::new(ErrorKind::Timeout).is_locked());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(adt(409, "x", "y").status(), Some(409));
        assert_eq!(Error::new(ErrorKind::NotFound("a".into())).status(), Some(404));
        assert_eq!(Error::new(ErrorKind::Timeout).status(), None);
    }

    #[test]
    fn test_error_kind_display_messages() {
        let cases: Vec<(ErrorKind, &str)> = vec![
            (
                ErrorKind::Http {
                    status: 500,
                    message: "Internal Server Error".into(),
                },
                "HTTP error: 500 Internal Server Error",
            ),
            (
                ErrorKind::Adt {
                    status: 400,
                    exception_type: "ExceptionResourceAlreadyExists".into(),
                    message: "exists".into(),
                },
                "ADT error (400): ExceptionResourceAlreadyExists - exists",
            ),
            (ErrorKind::RateLimited { retry_after: None }, "Rate limited"),
            (ErrorKind::Csrf("missing".into()), "CSRF token error: missing"),
            (ErrorKind::Timeout, "Request timeout"),
            (ErrorKind::Xml("bad".into()), "XML error: bad"),
            (
                ErrorKind::RetriesExhausted { attempts: 3 },
                "All 3 retry attempts exhausted",
            ),
        ];

        for (kind, expected_substring) in cases {
            let display = kind.to_string();
            assert!(
                display.contains(expected_substring),
                "Expected '{display}' to contain '{expected_substring}'"
            );
        }
    }

    #[test]
    fn test_from_url_parse_error() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = url_err.into();
        assert!(matches!(err.kind, ErrorKind::InvalidUrl(_)));
        assert!(err.source.is_some());
    }
}
