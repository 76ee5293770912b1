//! CDS views (`DDLS/DF`).

use super::{document, Adt, ObjectSpec, SourceConfig};
use crate::error::Result;
use crate::object_kind::ObjectKind;

pub type AdtView = Adt<ViewSpec>;

pub type ViewConfig = SourceConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct ViewSpec;

impl ObjectSpec for ViewSpec {
    type Config = ViewConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::View
    }

    fn create_body(&self, config: &ViewConfig) -> Result<String> {
        Ok(document(
            "ddl:ddlSource",
            "xmlns:ddl=\"http://www.sap.com/adt/ddic/ddlsources\"",
            &config.header,
            ObjectKind::View,
            "",
            "",
        ))
    }
}
