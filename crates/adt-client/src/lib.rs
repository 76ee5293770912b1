//! # adt-client
//!
//! Core HTTP client infrastructure for SAP ABAP Development Tools (ADT).
//!
//! This crate provides:
//! - CSRF token fetch and one-shot replay when the server demands a new token
//! - Cookie-backed SAP sessions with explicit stateful/stateless switching
//! - Basic and bearer authentication, with an optional token refresher
//! - Mapping of `exc:exception` bodies to typed errors
//! - Per-kind timeouts and opt-in retry of idempotent requests
//! - A small XML tree reader for ADT responses
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │        (adt-objects, adt-repository)                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    AdtConnection                            │
//! │  - Base URL, sap-client, sap-language                       │
//! │  - Auth header, CSRF token, session type                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    AdtHttpClient                            │
//! │  - Cookie store, timeouts, compression, retry               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use abap_adt_client::{AdtConnection, ConnectionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), abap_adt_client::Error> {
//!     let conn = AdtConnection::new(
//!         ConnectionConfig::basic("https://sap.example.com:44300", "DEVELOPER", "secret")
//!             .with_client("100"),
//!     )?;
//!
//!     let source = conn
//!         .send_text(conn.get("/sap/bc/adt/oo/classes/zcl_demo/source/main"))
//!         .await?;
//!     println!("{source}");
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod connection;
mod error;
mod request;
mod response;
mod retry;
pub mod security;
pub mod xml;

pub use client::AdtHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder, CompressionConfig, TimeoutConfig, TimeoutKind};
pub use connection::{
    AdtConnection, Auth, ConnectionConfig, SessionType, TokenRefresher, CSRF_HEADER,
    DISCOVERY_PATH, SESSION_TYPE_HEADER,
};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBody, RequestBuilder, RequestMethod};
pub use response::{AdtException, Response};
pub use retry::{BackoffStrategy, RetryConfig, RetryPolicy};
pub use xml::XmlNode;

pub use futures::future::BoxFuture;

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("abap-adt-api/", env!("CARGO_PKG_VERSION"));
