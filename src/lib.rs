//! # abap-adt-api
//!
//! A client library for SAP ABAP Development Tools (ADT) REST services.
//!
//! It creates, reads, changes, checks, activates and deletes ABAP repository
//! objects through the same HTTP/XML interface the Eclipse ADT plugin uses.
//! Every change to an existing object runs through a lock chain: lock,
//! write, unlock, check, activate. A failed step releases the lock.
//!
//! ## Security
//!
//! - Passwords and tokens are redacted in `Debug` output
//! - Tracing spans skip credentials, lock handles and source bodies
//! - Object names and transport numbers are validated before they reach a URL
//!
//! ## Crates
//!
//! - **abap-adt-client** - HTTP client: CSRF tokens, sessions, cookies, error mapping
//! - **abap-adt-auth** - Credentials from the environment, XSUAA token refresh
//! - **abap-adt-objects** - Object kinds, lock workflow, builders, transports
//! - **abap-adt-repository** - Search, where-used, data preview, package contents
//! - **abap-adt-ws** - WebSocket RPC and debugger session client
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use abap_adt_api::{AdtClass, ClassConfig, CreateOptions, ObjectHeader, SapCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let conn = SapCredentials::from_env()?.connect()?;
//!
//!     let classes = AdtClass::new(conn);
//!     let config = ClassConfig::new(ObjectHeader::new("ZCL_HELLO", "$TMP", "Hello"))
//!         .with_source("CLASS zcl_hello DEFINITION PUBLIC CREATE PUBLIC.\nENDCLASS.\nCLASS zcl_hello IMPLEMENTATION.\nENDCLASS.");
//!
//!     let result = classes.create(&config, CreateOptions::default()).await?;
//!     println!("created: {}, activated: {:?}", result.created, result.activation.map(|a| a.success));
//!     Ok(())
//! }
//! ```

#[cfg(feature = "auth")]
pub use abap_adt_auth as auth;
#[cfg(feature = "client")]
pub use abap_adt_client as client;
#[cfg(feature = "objects")]
pub use abap_adt_objects as objects;
#[cfg(feature = "repository")]
pub use abap_adt_repository as repository;
#[cfg(feature = "ws")]
pub use abap_adt_ws as ws;

#[cfg(feature = "auth")]
pub use abap_adt_auth::SapCredentials;
#[cfg(feature = "client")]
pub use abap_adt_client::{AdtConnection, ConnectionConfig, SessionType};
#[cfg(feature = "objects")]
pub use abap_adt_objects::{
    Adt, AdtBehaviorDefinition, AdtBehaviorImplementation, AdtClass, AdtDataElement, AdtDomain,
    AdtFunctionGroup, AdtFunctionModule, AdtInclude, AdtInterface, AdtMetadataExtension,
    AdtPackage, AdtProgram, AdtServiceDefinition, AdtStructure, AdtTable, AdtView, ClassBuilder,
    ClassConfig, CreateOptions, DataElementBuilder, DomainBuilder, ObjectClient, ObjectHeader,
    ObjectKind, ObjectRef, UpdateOptions, Version,
};
#[cfg(feature = "repository")]
pub use abap_adt_repository::RepositoryClient;
#[cfg(feature = "ws")]
pub use abap_adt_ws::{DebuggerSessionClient, WsRpcClient};
