//! HTTP request building with ADT-specific headers.

use bytes::Bytes;
use std::collections::HashMap;

use crate::config::TimeoutKind;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
            RequestMethod::Head => reqwest::Method::HEAD,
        }
    }

    /// GET and HEAD never modify repository state.
    pub fn is_idempotent(&self) -> bool {
        matches!(self, RequestMethod::Get | RequestMethod::Head)
    }

    /// Modifying requests must carry a CSRF token.
    pub fn requires_csrf(&self) -> bool {
        !self.is_idempotent()
    }
}

/// Builder for a single ADT HTTP request.
///
/// The path is relative to the system base URL (`/sap/bc/adt/...`); auth,
/// CSRF, session and client headers are attached by
/// [`AdtConnection`](crate::AdtConnection) when the request is sent.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    pub(crate) method: RequestMethod,
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) query_params: Vec<(String, String)>,
    pub(crate) body: Option<RequestBody>,
    pub(crate) timeout: TimeoutKind,
}

/// Request body content.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Text(String),
    Bytes(Bytes),
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            query_params: Vec::new(),
            body: None,
            timeout: TimeoutKind::Default,
        }
    }

    /// The request method.
    pub fn method(&self) -> RequestMethod {
        self.method
    }

    /// The request URL or path.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Look up a header set on this request.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter only when a value is present.
    pub fn query_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    /// Set the `Accept` header.
    pub fn accept(self, mime: impl Into<String>) -> Self {
        self.header("Accept", mime)
    }

    /// Set an XML body with the given ADT content type.
    pub fn xml(mut self, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self.headers
            .insert("Content-Type".to_string(), content_type.into());
        self
    }

    /// Set a plain-text body (ABAP source, SQL).
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self.headers.insert(
            "Content-Type".to_string(),
            "text/plain; charset=utf-8".to_string(),
        );
        self
    }

    /// Set a raw body.
    pub fn bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(RequestBody::Bytes(body.into()));
        self
    }

    /// Use the long timeout (activation, check runs, data preview).
    pub fn long_running(mut self) -> Self {
        self.timeout = TimeoutKind::Long;
        self
    }

    /// Select the timeout bucket explicitly.
    pub fn timeout_kind(mut self, kind: TimeoutKind) -> Self {
        self.timeout = kind;
        self
    }
}
