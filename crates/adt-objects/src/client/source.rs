use tracing::{debug, instrument};

use super::xml_helpers::object_metadata;
use crate::error::{Error, ErrorKind, Result};
use crate::object_kind::ObjectRef;
use crate::types::{ObjectMetadata, Version};

impl super::ObjectClient {
    /// Create an object by posting its XML to the collection.
    #[instrument(skip(self, body), fields(uri = %object.uri))]
    pub async fn create(
        &self,
        object: &ObjectRef,
        body: String,
        transport: Option<&str>,
    ) -> Result<()> {
        let request = self
            .conn
            .post(&object.create_uri())
            .query_opt("corrNr", transport)
            .xml(object.kind.content_type(), body);

        match self.conn.send(request).await {
            Ok(_) => {
                debug!("Object created");
                Ok(())
            }
            Err(err) if err.is_already_exists() => Err(Error::with_source(
                ErrorKind::AlreadyExists(object.name.clone()),
                err,
            )),
            Err(err) => Err(err.into()),
        }
    }

    /// Write source text under a held lock.
    #[instrument(skip(self, content, lock_handle))]
    pub async fn update_source(
        &self,
        source_uri: &str,
        content: &str,
        lock_handle: &str,
        transport: Option<&str>,
    ) -> Result<()> {
        let request = self
            .conn
            .put(source_uri)
            .query("lockHandle", lock_handle)
            .query_opt("corrNr", transport)
            .text(content);
        self.conn.send(request).await?;
        debug!(bytes = content.len(), "Source written");
        Ok(())
    }

    /// Replace an object's XML definition under a held lock.
    #[instrument(skip(self, body, lock_handle))]
    pub async fn update_metadata(
        &self,
        uri: &str,
        content_type: &str,
        body: String,
        lock_handle: &str,
        transport: Option<&str>,
    ) -> Result<()> {
        let request = self
            .conn
            .put(uri)
            .query("lockHandle", lock_handle)
            .query_opt("corrNr", transport)
            .xml(content_type, body);
        self.conn.send(request).await?;
        debug!("Definition written");
        Ok(())
    }

    /// Read an object's definition and its `adtcore` metadata.
    #[instrument(skip(self), fields(uri = %object.uri))]
    pub async fn read_metadata(&self, object: &ObjectRef) -> Result<ObjectMetadata> {
        let request = self.conn.get(&object.uri).accept(object.kind.content_type());
        let body = self.conn.send_text(request).await?;
        object_metadata(&object.uri, &body)
    }

    /// Read the `adtcore` metadata of any object URI.
    #[instrument(skip(self))]
    pub async fn read_metadata_at(&self, uri: &str) -> Result<ObjectMetadata> {
        let request = self.conn.get(uri).accept("application/*");
        let body = self.conn.send_text(request).await?;
        object_metadata(uri, &body)
    }

    /// Read source text of any source URI.
    #[instrument(skip(self))]
    pub async fn read_source_at(&self, source_uri: &str, version: Version) -> Result<String> {
        let request = self
            .conn
            .get(source_uri)
            .query("version", version.as_str())
            .accept("text/plain");
        Ok(self.conn.send_text(request).await?)
    }

    /// Read the main source of an object.
    pub async fn read_source(&self, object: &ObjectRef, version: Version) -> Result<String> {
        if !object.kind.is_source_based() {
            return Err(Error::new(ErrorKind::InvalidConfig(format!(
                "{} objects have no source",
                object.kind
            ))));
        }
        self.read_source_at(&object.source_uri(), version).await
    }
}
