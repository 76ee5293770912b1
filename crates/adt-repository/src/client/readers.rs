use abap_adt_objects::{ObjectMetadata, Version};
use tracing::instrument;

use crate::error::Result;

impl super::RepositoryClient {
    /// `adtcore` metadata of any object URI.
    #[instrument(skip(self))]
    pub async fn read_object_metadata(&self, uri: &str) -> Result<ObjectMetadata> {
        Ok(self.objects.read_metadata_at(uri).await?)
    }

    /// Source text behind any source URI.
    #[instrument(skip(self))]
    pub async fn read_source(&self, uri: &str, version: Version) -> Result<String> {
        Ok(self.objects.read_source_at(uri, version).await?)
    }
}
