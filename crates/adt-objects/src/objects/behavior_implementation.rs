//! Behavior pools: global classes bound to a RAP root entity.
//!
//! The global class only declares `FOR BEHAVIOR OF`; the handler and saver
//! classes live in the class-local implementations include. An update
//! writes both under one lock.

use super::class::{class_document, class_payloads, ClassInclude, Visibility};
use super::{invalid, upper, Adt, ObjectConfig, ObjectHeader, ObjectSpec};
use crate::error::Result;
use crate::object_kind::{ObjectKind, ObjectRef};
use crate::workflow::UpdatePayload;

pub type AdtBehaviorImplementation = Adt<BehaviorImplementationSpec>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorImplementationConfig {
    pub header: ObjectHeader,
    /// Root entity of the behavior definition.
    pub root_entity: String,
    /// Main source; generated from the root entity when unset.
    pub source: Option<String>,
    /// Local handler classes.
    pub implementations: Option<String>,
}

impl BehaviorImplementationConfig {
    pub fn new(header: ObjectHeader, root_entity: impl Into<String>) -> Self {
        Self {
            header,
            root_entity: upper(root_entity),
            source: None,
            implementations: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_implementations(mut self, source: impl Into<String>) -> Self {
        self.implementations = Some(source.into());
        self
    }

    /// Main source declaring the behavior pool.
    pub fn main_source(&self) -> String {
        match &self.source {
            Some(source) => source.clone(),
            None => behavior_pool_source(&self.header.name, &self.root_entity),
        }
    }
}

impl ObjectConfig for BehaviorImplementationConfig {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn validate(&self) -> Result<()> {
        self.header.validate()?;
        if self.root_entity.is_empty() {
            return Err(invalid("behavior pool needs a root entity"));
        }
        if let Some(source) = &self.source {
            if !source.to_ascii_uppercase().contains("FOR BEHAVIOR OF") {
                return Err(invalid("behavior pool source must declare FOR BEHAVIOR OF"));
            }
        }
        Ok(())
    }
}

/// Skeleton of a behavior pool's global class.
pub fn behavior_pool_source(class_name: &str, root_entity: &str) -> String {
    let class_name = class_name.to_ascii_lowercase();
    format!(
        "CLASS {class_name} DEFINITION PUBLIC ABSTRACT FINAL FOR BEHAVIOR OF {}.\nENDCLASS.\n\nCLASS {class_name} IMPLEMENTATION.\nENDCLASS.\n",
        root_entity.to_ascii_lowercase()
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BehaviorImplementationSpec;

impl ObjectSpec for BehaviorImplementationSpec {
    type Config = BehaviorImplementationConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::BehaviorImplementation
    }

    fn create_body(&self, config: &BehaviorImplementationConfig) -> Result<String> {
        Ok(class_document(
            &config.header,
            ObjectKind::BehaviorImplementation,
            true,
            true,
            Visibility::Public,
            None,
        ))
    }

    fn update_payloads(
        &self,
        object: &ObjectRef,
        config: &BehaviorImplementationConfig,
    ) -> Result<Vec<UpdatePayload>> {
        let includes: Vec<(ClassInclude, String)> = config
            .implementations
            .iter()
            .map(|source| (ClassInclude::Implementations, source.clone()))
            .collect();
        let main = config.main_source();
        Ok(class_payloads(object, Some(main.as_str()), &includes))
    }
}
