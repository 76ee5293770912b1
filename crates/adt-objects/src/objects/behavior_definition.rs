//! RAP behavior definitions (`BDEF/BDO`).

use super::table::BLUE_NS;
use super::{document, Adt, ObjectConfig, ObjectHeader, ObjectSpec};
use crate::error::Result;
use crate::object_kind::ObjectKind;

pub type AdtBehaviorDefinition = Adt<BehaviorDefinitionSpec>;

/// Implementation type the backend generates the skeleton for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImplementationType {
    #[default]
    Managed,
    Unmanaged,
    Abstract,
    Projection,
    Interface,
}

impl ImplementationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImplementationType::Managed => "Managed",
            ImplementationType::Unmanaged => "Unmanaged",
            ImplementationType::Abstract => "Abstract",
            ImplementationType::Projection => "Projection",
            ImplementationType::Interface => "Interface",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorDefinitionConfig {
    /// Named like its root entity.
    pub header: ObjectHeader,
    pub implementation_type: ImplementationType,
    pub source: Option<String>,
}

impl BehaviorDefinitionConfig {
    pub fn new(header: ObjectHeader, implementation_type: ImplementationType) -> Self {
        Self {
            header,
            implementation_type,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl ObjectConfig for BehaviorDefinitionConfig {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BehaviorDefinitionSpec;

impl ObjectSpec for BehaviorDefinitionSpec {
    type Config = BehaviorDefinitionConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::BehaviorDefinition
    }

    fn create_body(&self, config: &BehaviorDefinitionConfig) -> Result<String> {
        let template = format!(
            "\n  <adtcore:adtTemplate>\n    <adtcore:adtProperty adtcore:key=\"implementation_type\">{}</adtcore:adtProperty>\n  </adtcore:adtTemplate>",
            config.implementation_type.as_str()
        );
        Ok(document(
            "blue:blueSource",
            BLUE_NS,
            &config.header,
            ObjectKind::BehaviorDefinition,
            "",
            &template,
        ))
    }
}
