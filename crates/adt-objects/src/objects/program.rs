//! Executable programs (`PROG/P`).

use super::{document, Adt, ObjectSpec, SourceConfig};
use crate::error::Result;
use crate::object_kind::ObjectKind;

pub type AdtProgram = Adt<ProgramSpec>;

pub type ProgramConfig = SourceConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgramSpec;

impl ObjectSpec for ProgramSpec {
    type Config = ProgramConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::Program
    }

    fn create_body(&self, config: &ProgramConfig) -> Result<String> {
        Ok(document(
            "program:abapProgram",
            "xmlns:program=\"http://www.sap.com/adt/programs/programs\"",
            &config.header,
            ObjectKind::Program,
            "",
            "",
        ))
    }
}
