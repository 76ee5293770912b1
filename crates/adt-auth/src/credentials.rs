//! SAP system credentials.
//!
//! Sensitive fields are redacted in Debug output.

use std::sync::Arc;
use std::time::Duration;

use abap_adt_client::{AdtConnection, Auth, ClientConfig, ConnectionConfig, TimeoutConfig};
use tracing::debug;

use crate::error::{Error, ErrorKind, Result};
use crate::oauth::{UaaConfig, UaaTokenRefresher};

/// How the client authenticates against the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthType {
    /// User name and password (on-premise systems).
    #[default]
    Basic,
    /// Bearer token issued by XSUAA (BTP ABAP environment).
    Jwt,
}

impl std::str::FromStr for AuthType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "basic" => Ok(AuthType::Basic),
            "jwt" | "xsuaa" | "oauth" => Ok(AuthType::Jwt),
            other => Err(Error::new(ErrorKind::InvalidVariable(format!(
                "unknown auth type '{other}' (expected basic or jwt)"
            )))),
        }
    }
}

/// Credentials and connection settings for one SAP system.
#[derive(Clone)]
pub struct SapCredentials {
    url: String,
    client: Option<String>,
    language: Option<String>,
    auth_type: AuthType,
    username: Option<String>,
    password: Option<String>,
    jwt_token: Option<String>,
    refresh_token: Option<String>,
    uaa: Option<UaaConfig>,
    timeouts: TimeoutConfig,
}

impl std::fmt::Debug for SapCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SapCredentials")
            .field("url", &self.url)
            .field("client", &self.client)
            .field("language", &self.language)
            .field("auth_type", &self.auth_type)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_token", &self.jwt_token.as_ref().map(|_| "[REDACTED]"))
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("uaa", &self.uaa)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl SapCredentials {
    /// Credentials for basic authentication.
    pub fn basic(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::empty(url, AuthType::Basic)
        }
    }

    /// Credentials for bearer-token authentication.
    pub fn jwt(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            jwt_token: Some(token.into()),
            ..Self::empty(url, AuthType::Jwt)
        }
    }

    fn empty(url: impl Into<String>, auth_type: AuthType) -> Self {
        Self {
            url: url.into(),
            client: None,
            language: None,
            auth_type,
            username: None,
            password: None,
            jwt_token: None,
            refresh_token: None,
            uaa: None,
            timeouts: TimeoutConfig::default(),
        }
    }

    /// Set the SAP client.
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Set the logon language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Enable token refresh through the given UAA.
    pub fn with_refresh(mut self, uaa: UaaConfig, refresh_token: impl Into<String>) -> Self {
        self.uaa = Some(uaa);
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Override the request timeouts.
    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// System URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// SAP client.
    pub fn client(&self) -> Option<&str> {
        self.client.as_deref()
    }

    /// Logon language.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Authentication type.
    pub fn auth_type(&self) -> AuthType {
        self.auth_type
    }

    /// User name for basic authentication.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Request timeouts.
    pub fn timeouts(&self) -> TimeoutConfig {
        self.timeouts
    }

    /// True if the credentials carry what their auth type needs.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(invalid("system URL is empty"));
        }
        match self.auth_type {
            AuthType::Basic => {
                if self.username.as_deref().unwrap_or_default().is_empty() {
                    return Err(invalid("basic auth requires a user name"));
                }
                if self.password.as_deref().unwrap_or_default().is_empty() {
                    return Err(invalid("basic auth requires a password"));
                }
            }
            AuthType::Jwt => {
                if self.jwt_token.as_deref().unwrap_or_default().is_empty() {
                    return Err(invalid("jwt auth requires a token"));
                }
            }
        }
        Ok(())
    }

    /// Load credentials from environment variables.
    ///
    /// Required:
    /// - `SAP_URL`
    /// - `SAP_USERNAME` and `SAP_PASSWORD` for basic auth (the default), or
    ///   `SAP_JWT_TOKEN` when `SAP_AUTH_TYPE` is `jwt`/`xsuaa`
    ///
    /// Optional:
    /// - `SAP_CLIENT`, `SAP_LANGUAGE`
    /// - `SAP_REFRESH_TOKEN`, `SAP_UAA_URL`, `SAP_UAA_CLIENT_ID`,
    ///   `SAP_UAA_CLIENT_SECRET` (token refresh, all four together)
    /// - `SAP_TIMEOUT_DEFAULT`, `SAP_TIMEOUT_CSRF`, `SAP_TIMEOUT_LONG` (milliseconds)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load credentials through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| var(key).ok_or_else(|| Error::new(ErrorKind::MissingVariable(key.into())));

        let url = required("SAP_URL")?;
        let auth_type = var("SAP_AUTH_TYPE")
            .map(|v| v.parse::<AuthType>())
            .transpose()?
            .unwrap_or_default();

        let mut creds = match auth_type {
            AuthType::Basic => {
                Self::basic(url, required("SAP_USERNAME")?, required("SAP_PASSWORD")?)
            }
            AuthType::Jwt => {
                let mut creds = Self::jwt(url, required("SAP_JWT_TOKEN")?);
                if let (Some(refresh), Some(uaa_url), Some(client_id), Some(secret)) = (
                    var("SAP_REFRESH_TOKEN"),
                    var("SAP_UAA_URL"),
                    var("SAP_UAA_CLIENT_ID"),
                    var("SAP_UAA_CLIENT_SECRET"),
                ) {
                    creds = creds.with_refresh(UaaConfig::new(uaa_url, client_id, secret), refresh);
                }
                creds
            }
        };

        creds.client = var("SAP_CLIENT");
        creds.language = var("SAP_LANGUAGE");

        let millis = |key: &str, fallback: Duration| -> Result<Duration> {
            match var(key) {
                Some(value) => value.parse::<u64>().map(Duration::from_millis).map_err(|_| {
                    Error::new(ErrorKind::InvalidVariable(format!("{key} must be milliseconds")))
                }),
                None => Ok(fallback),
            }
        };
        let defaults = TimeoutConfig::default();
        creds.timeouts = TimeoutConfig {
            default: millis("SAP_TIMEOUT_DEFAULT", defaults.default)?,
            csrf: millis("SAP_TIMEOUT_CSRF", defaults.csrf)?,
            long: millis("SAP_TIMEOUT_LONG", defaults.long)?,
        };

        Ok(creds)
    }

    /// Build the connection configuration for these credentials.
    pub fn connection_config(&self) -> Result<ConnectionConfig> {
        self.validate()?;

        let auth = match self.auth_type {
            AuthType::Basic => Auth::Basic {
                username: self.username.clone().unwrap_or_default(),
                password: self.password.clone().unwrap_or_default(),
            },
            AuthType::Jwt => Auth::Bearer(self.jwt_token.clone().unwrap_or_default()),
        };

        Ok(ConnectionConfig {
            base_url: self.url.clone(),
            client: self.client.clone(),
            language: self.language.clone(),
            auth,
            http: ClientConfig::builder().with_timeouts(self.timeouts).build(),
        })
    }

    /// Open a connection, wiring token refresh when configured.
    pub fn connect(&self) -> Result<AdtConnection> {
        let config = self.connection_config()?;
        let connection = match (&self.uaa, &self.refresh_token, self.auth_type) {
            (Some(uaa), Some(refresh), AuthType::Jwt) => {
                debug!("Connecting with XSUAA token refresh");
                AdtConnection::with_token_refresher(
                    config,
                    Arc::new(UaaTokenRefresher::new(uaa.clone(), refresh.clone())),
                )?
            }
            _ => AdtConnection::new(config)?,
        };
        Ok(connection)
    }
}

fn invalid(message: &str) -> Error {
    Error::new(ErrorKind::InvalidCredentials(message.to_string()))
}
