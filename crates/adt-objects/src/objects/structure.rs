//! Dictionary structures (`TABL/DS`).

use super::table::BLUE_NS;
use super::{document, Adt, ObjectSpec, SourceConfig};
use crate::error::Result;
use crate::object_kind::ObjectKind;

pub type AdtStructure = Adt<StructureSpec>;

pub type StructureConfig = SourceConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct StructureSpec;

impl ObjectSpec for StructureSpec {
    type Config = StructureConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::Structure
    }

    fn create_body(&self, config: &StructureConfig) -> Result<String> {
        Ok(document(
            "blue:blueSource",
            BLUE_NS,
            &config.header,
            ObjectKind::Structure,
            "",
            "",
        ))
    }
}
