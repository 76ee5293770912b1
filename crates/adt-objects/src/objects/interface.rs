//! ABAP interfaces (`INTF/OI`).

use super::{document, Adt, ObjectSpec, SourceConfig};
use crate::error::Result;
use crate::object_kind::ObjectKind;

pub type AdtInterface = Adt<InterfaceSpec>;

pub type InterfaceConfig = SourceConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceSpec;

impl ObjectSpec for InterfaceSpec {
    type Config = InterfaceConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::Interface
    }

    fn create_body(&self, config: &InterfaceConfig) -> Result<String> {
        Ok(document(
            "intf:abapInterface",
            "xmlns:intf=\"http://www.sap.com/adt/oo/interfaces\"",
            &config.header,
            ObjectKind::Interface,
            "",
            "",
        ))
    }
}
