//! HTTP response handling with ADT exception parsing.

use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};
use crate::xml::XmlNode;

/// Wrapper around an HTTP response.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// Returns true if this is a 304 Not Modified response.
    pub fn is_not_modified(&self) -> bool {
        self.status() == 304
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get the `x-csrf-token` header.
    pub fn csrf_token(&self) -> Option<&str> {
        self.header("x-csrf-token")
    }

    /// Get the Retry-After header as a Duration (seconds form only).
    pub fn retry_after(&self) -> Option<Duration> {
        self.header("retry-after")?
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(Into::into)
    }

    /// Get the response body as bytes.
    pub async fn bytes(self) -> Result<bytes::Bytes> {
        self.inner.bytes().await.map_err(Into::into)
    }

    /// Read the body and parse it as XML. An empty body yields `None`.
    pub async fn xml(self) -> Result<Option<XmlNode>> {
        let body = self.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        XmlNode::parse(&body).map(Some)
    }

    /// Get access to the inner reqwest::Response.
    pub fn into_inner(self) -> reqwest::Response {
        self.inner
    }

    /// Convert a non-success response into an [`Error`].
    pub async fn check_adt_error(self) -> Result<Response> {
        if self.is_success() || self.is_not_modified() {
            return Ok(self);
        }
        let status = self.status();
        let body = self.text().await.unwrap_or_default();
        Err(parse_error_response(status, &body))
    }
}

/// Structured content of an `exc:exception` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdtException {
    pub namespace: Option<String>,
    pub exception_type: String,
    pub message: String,
}

impl AdtException {
    /// Parse an ADT exception document; `None` if the body is not one.
    pub fn parse(body: &str) -> Option<Self> {
        let root = XmlNode::parse(body).ok()?;
        if root.local_name() != "exception" {
            return None;
        }
        let exception_type = root
            .child("type")
            .and_then(|t| t.attr("id"))
            .unwrap_or_default()
            .to_string();
        let message = root
            .child_text("localizedMessage")
            .filter(|m| !m.is_empty())
            .or_else(|| root.child_text("message"))
            .unwrap_or_default()
            .to_string();
        Some(Self {
            namespace: root
                .child("namespace")
                .and_then(|n| n.attr("id"))
                .map(str::to_string),
            exception_type,
            message,
        })
    }
}

/// Map a status code and body to an error kind.
pub(crate) fn parse_error_response(status: u16, body: &str) -> Error {
    if status == 429 {
        return Error::new(ErrorKind::RateLimited { retry_after: None });
    }

    if let Some(exception) = AdtException::parse(body) {
        let message = sanitize_error_message(&exception.message);
        return Error::new(match status {
            401 => ErrorKind::Authentication(message),
            _ => ErrorKind::Adt {
                status,
                exception_type: exception.exception_type,
                message,
            },
        });
    }

    let sanitized = sanitize_error_message(body);
    let kind = match status {
        401 => ErrorKind::Authentication(sanitized),
        403 => ErrorKind::Authorization(sanitized),
        404 => ErrorKind::NotFound(sanitized),
        _ => ErrorKind::Http {
            status,
            message: sanitized,
        },
    };
    Error::new(kind)
}

static SESSION_COOKIE: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r"(SAP_SESSIONID_[A-Za-z0-9_]+|MYSAPSSO2|sap-contextid)=[^;\s]+")
        .expect("static regex")
});

static AUTH_HEADER: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r"(Bearer|Basic)\s+[A-Za-z0-9\-_.=+/]{8,}").expect("static regex")
});

/// Remove session cookies and credentials from an error message and cap its length.
pub(crate) fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let sanitized = SESSION_COOKIE.replace_all(message, "$1=[REDACTED]");
    let mut sanitized = AUTH_HEADER
        .replace_all(&sanitized, "$1 [REDACTED]")
        .into_owned();

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}
