//! Service definitions (`SRVD/SRV`).

use super::{document, Adt, ObjectSpec, SourceConfig};
use crate::error::Result;
use crate::object_kind::ObjectKind;

pub type AdtServiceDefinition = Adt<ServiceDefinitionSpec>;

pub type ServiceDefinitionConfig = SourceConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceDefinitionSpec;

impl ObjectSpec for ServiceDefinitionSpec {
    type Config = ServiceDefinitionConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::ServiceDefinition
    }

    fn create_body(&self, config: &ServiceDefinitionConfig) -> Result<String> {
        Ok(document(
            "srvd:srvdSource",
            "xmlns:srvd=\"http://www.sap.com/adt/ddic/srvdsources\"",
            &config.header,
            ObjectKind::ServiceDefinition,
            " srvd:srvdSourceType=\"S\"",
            "",
        ))
    }
}
