//! # adt-repository
//!
//! Repository-wide SAP ADT queries that are not tied to a single object
//! handle: quick search, where-used lists, data preview, package node
//! structure and inactive objects. Group activation and deletion are
//! [`ObjectClient`](abap_adt_objects::ObjectClient) verbs and reachable
//! through [`RepositoryClient::objects`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use abap_adt_repository::RepositoryClient;
//!
//! let repo = RepositoryClient::new(conn);
//! let usages = repo.where_used("/sap/bc/adt/oo/classes/zcl_demo").await?;
//! for usage in usages.iter().filter(|u| u.is_result) {
//!     println!("{} ({})", usage.name, usage.object_type);
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::RepositoryClient;
pub use error::{Error, ErrorKind, Result};
pub use types::{Column, InactiveObject, NodeEntry, SearchResult, TableData, UsageReference};
