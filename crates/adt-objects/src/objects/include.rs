//! Program includes (`PROG/I`).

use abap_adt_client::security::xml;

use super::{document, upper, Adt, ObjectConfig, ObjectHeader, ObjectSpec};
use crate::error::Result;
use crate::object_kind::{ObjectKind, ObjectRef};

pub type AdtInclude = Adt<IncludeSpec>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeConfig {
    pub header: ObjectHeader,
    /// Main program the include is checked in the context of.
    pub main_program: Option<String>,
    pub source: Option<String>,
}

impl IncludeConfig {
    pub fn new(header: ObjectHeader) -> Self {
        Self {
            header,
            main_program: None,
            source: None,
        }
    }

    pub fn with_main_program(mut self, program: impl Into<String>) -> Self {
        self.main_program = Some(upper(program));
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl ObjectConfig for IncludeConfig {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeSpec;

impl ObjectSpec for IncludeSpec {
    type Config = IncludeConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::Include
    }

    fn create_body(&self, config: &IncludeConfig) -> Result<String> {
        let context = match &config.main_program {
            Some(program) => {
                let main = ObjectRef::new(ObjectKind::Program, program)?;
                format!(
                    "\n  <include:containerRef adtcore:name=\"{}\" adtcore:type=\"PROG/P\" adtcore:uri=\"{}\"/>",
                    xml::escape(&main.name),
                    xml::escape(&main.uri)
                )
            }
            None => String::new(),
        };
        Ok(document(
            "include:abapInclude",
            "xmlns:include=\"http://www.sap.com/adt/programs/includes\"",
            &config.header,
            ObjectKind::Include,
            "",
            &context,
        ))
    }
}
