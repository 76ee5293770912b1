//! Database tables (`TABL/DT`), defined by their DDL-like source.

use super::{document, Adt, ObjectSpec, SourceConfig};
use crate::error::Result;
use crate::object_kind::ObjectKind;

pub type AdtTable = Adt<TableSpec>;

pub type TableConfig = SourceConfig;

pub(crate) const BLUE_NS: &str = "xmlns:blue=\"http://www.sap.com/wbobj/blue\"";

#[derive(Debug, Clone, Copy, Default)]
pub struct TableSpec;

impl ObjectSpec for TableSpec {
    type Config = TableConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::Table
    }

    fn create_body(&self, config: &TableConfig) -> Result<String> {
        Ok(document(
            "blue:blueSource",
            BLUE_NS,
            &config.header,
            ObjectKind::Table,
            "",
            "",
        ))
    }
}
