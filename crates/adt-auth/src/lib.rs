//! # adt-auth
//!
//! Authentication for SAP ABAP Development Tools connections.
//!
//! ## Security
//!
//! - Passwords, tokens and client secrets are redacted in Debug output
//! - Tracing skips credential parameters
//! - Error messages never carry credential values
//!
//! ## Supported Authentication Methods
//!
//! - **Basic** - user name and password, for on-premise systems
//! - **JWT bearer** - XSUAA-issued token for BTP ABAP environments, with
//!   optional refresh through the UAA token endpoint
//!
//! ## Example
//!
//! ```rust,ignore
//! use abap_adt_auth::SapCredentials;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = SapCredentials::from_env()?;
//!     let conn = creds.connect()?;
//!     conn.fetch_csrf_token().await?;
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod oauth;

pub use credentials::{AuthType, SapCredentials};
pub use error::{Error, ErrorKind, Result};
pub use oauth::{TokenResponse, UaaClient, UaaConfig, UaaTokenRefresher};
