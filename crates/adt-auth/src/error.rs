//! Errors raised while reading SAP credentials or refreshing XSUAA tokens.
//!
//! No variant carries a password, client secret or token value.

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

    fn caused_by(kind: ErrorKind, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// A required `SAP_*` variable is absent or empty.
    #[error("{0} is not set")]
    MissingVariable(String),

    /// A `SAP_*` variable holds a value that cannot be used.
    #[error("Invalid SAP setting: {0}")]
    InvalidVariable(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The UAA answered the token request with an error.
    #[error("UAA rejected token request: {error} ({description})")]
    Uaa { error: String, description: String },

    /// The token request could not be sent or its answer not read.
    #[error("Token request failed: {0}")]
    TokenRequest(String),

    #[error("Malformed token exchange: {0}")]
    TokenFormat(String),

    /// Building the ADT connection from the credentials failed.
    #[error("Cannot connect to ADT: {0}")]
    Connection(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // reqwest may echo the form body or URL; never surface either.
        let message = match err.status() {
            Some(status) => format!("UAA returned {status}"),
            None if err.is_timeout() => "timed out".to_string(),
            None => "transport error".to_string(),
        };
        Error::caused_by(ErrorKind::TokenRequest(message), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::caused_by(ErrorKind::TokenFormat(err.to_string()), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::caused_by(ErrorKind::TokenFormat(err.to_string()), err)
    }
}

impl From<abap_adt_client::Error> for Error {
    fn from(err: abap_adt_client::Error) -> Self {
        Error::caused_by(ErrorKind::Connection(err.to_string()), err)
    }
}

/// Surfaces as an authentication failure on the ADT side.
impl From<Error> for abap_adt_client::Error {
    fn from(err: Error) -> Self {
        abap_adt_client::Error::with_source(
            abap_adt_client::ErrorKind::Authentication(err.kind.to_string()),
            err,
        )
    }
}
