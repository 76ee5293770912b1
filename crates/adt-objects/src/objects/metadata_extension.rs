//! CDS metadata extensions (`DDLX/EX`).

use super::{document, Adt, ObjectSpec, SourceConfig};
use crate::error::Result;
use crate::object_kind::ObjectKind;

pub type AdtMetadataExtension = Adt<MetadataExtensionSpec>;

pub type MetadataExtensionConfig = SourceConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtensionSpec;

impl ObjectSpec for MetadataExtensionSpec {
    type Config = MetadataExtensionConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::MetadataExtension
    }

    fn create_body(&self, config: &MetadataExtensionConfig) -> Result<String> {
        Ok(document(
            "ddlxsources:ddlxSource",
            "xmlns:ddlxsources=\"http://www.sap.com/adt/ddic/ddlxsources\"",
            &config.header,
            ObjectKind::MetadataExtension,
            "",
            "",
        ))
    }
}
