use abap_adt_client::SessionType;
use tracing::{debug, instrument};

use super::xml_helpers::{abap_bool, data_field, parse};
use crate::error::{Error, ErrorKind, Result};
use crate::object_kind::ObjectRef;
use crate::types::LockResult;

/// Accept header of the lock request; both result versions are understood.
pub const LOCK_ACCEPT: &str = "application/vnd.sap.as+xml;charset=UTF-8;dataname=com.sap.adt.lock.result;q=0.8, application/vnd.sap.as+xml;charset=UTF-8;dataname=com.sap.adt.lock.result2;q=0.9";

impl super::ObjectClient {
    /// Lock an object for modification.
    ///
    /// Switches the connection to a stateful session first; if the lock is
    /// refused the session is forced back to stateless.
    #[instrument(skip(self), fields(uri = %object.uri))]
    pub async fn lock(&self, object: &ObjectRef) -> Result<LockResult> {
        self.conn.set_session_type(SessionType::Stateful);

        let request = self
            .conn
            .post(&object.uri)
            .query("_action", "LOCK")
            .query("accessMode", "MODIFY")
            .accept(LOCK_ACCEPT);

        let result = match self.conn.send_text(request).await {
            Ok(body) => parse_lock_result(&body),
            Err(err) => Err(Error::with_source(
                ErrorKind::LockFailed(object.name.clone()),
                err,
            )),
        };

        match result {
            Ok(lock) => {
                debug!(corr_nr = ?lock.corr_nr, "Object locked");
                Ok(lock)
            }
            Err(err) => {
                self.conn.set_session_type(SessionType::Stateless);
                Err(err)
            }
        }
    }

    /// Release a lock. The session returns to stateless even if the
    /// backend rejects the unlock.
    #[instrument(skip(self, lock_handle), fields(uri = %object.uri))]
    pub async fn unlock(&self, object: &ObjectRef, lock_handle: &str) -> Result<()> {
        let request = self
            .conn
            .post(&object.uri)
            .query("_action", "UNLOCK")
            .query("lockHandle", lock_handle);

        let result = self.conn.send(request).await;
        self.conn.set_session_type(SessionType::Stateless);
        result?;
        debug!("Object unlocked");
        Ok(())
    }
}

/// Parse the `asx:abap` lock result.
pub(crate) fn parse_lock_result(body: &str) -> Result<LockResult> {
    let root = parse(body)?;
    let lock_handle = data_field(&root, "LOCK_HANDLE").ok_or_else(|| {
        Error::new(ErrorKind::Parse("lock response has no LOCK_HANDLE".to_string()))
    })?;

    Ok(LockResult {
        lock_handle,
        corr_nr: data_field(&root, "CORRNR"),
        corr_user: data_field(&root, "CORRUSER"),
        corr_text: data_field(&root, "CORRTEXT"),
        is_local: abap_bool(data_field(&root, "IS_LOCAL").as_deref()),
        is_link_up: abap_bool(data_field(&root, "IS_LINK_UP").as_deref()),
        modification_support: data_field(&root, "MODIFICATION_SUPPORT"),
    })
}
