//! Low-level ADT object verbs.
//!
//! Each submodule adds one group of verbs to [`ObjectClient`]. The verbs map
//! one-to-one to ADT requests; sequencing them safely is the job of
//! [`crate::workflow`].

use abap_adt_client::AdtConnection;

mod activation;
mod check;
mod deletion;
mod lock;
mod source;
mod transport;
mod validation;
pub(crate) mod xml_helpers;

pub use check::CheckObject;
pub use lock::LOCK_ACCEPT;
pub use transport::{
    TransportCheck, TransportHeader, TransportObject, TransportRequest, TransportTask,
};

/// Client for object-level ADT requests.
#[derive(Debug, Clone)]
pub struct ObjectClient {
    conn: AdtConnection,
}

impl ObjectClient {
    /// Create a client over an existing connection.
    pub fn new(conn: AdtConnection) -> Self {
        Self { conn }
    }

    /// The underlying connection.
    pub fn connection(&self) -> &AdtConnection {
        &self.conn
    }
}
