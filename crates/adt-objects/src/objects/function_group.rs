//! Function groups (`FUGR/F`).

use super::{document, Adt, ObjectConfig, ObjectHeader, ObjectSpec};
use crate::error::Result;
use crate::object_kind::{ObjectKind, ObjectRef};
use crate::workflow::UpdatePayload;

pub type AdtFunctionGroup = Adt<FunctionGroupSpec>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionGroupConfig {
    pub header: ObjectHeader,
}

impl FunctionGroupConfig {
    pub fn new(header: ObjectHeader) -> Self {
        Self { header }
    }
}

impl ObjectConfig for FunctionGroupConfig {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionGroupSpec;

impl ObjectSpec for FunctionGroupSpec {
    type Config = FunctionGroupConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::FunctionGroup
    }

    fn create_body(&self, config: &FunctionGroupConfig) -> Result<String> {
        Ok(document(
            "group:abapFunctionGroup",
            "xmlns:group=\"http://www.sap.com/adt/functions/groups\"",
            &config.header,
            ObjectKind::FunctionGroup,
            "",
            "",
        ))
    }

    /// The create request already carries everything a group has.
    fn create_payloads(
        &self,
        _object: &ObjectRef,
        _config: &FunctionGroupConfig,
    ) -> Result<Vec<UpdatePayload>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::xml_helpers::parse;

    #[test]
    fn test_group_payloads() {
        let config = FunctionGroupConfig::new(ObjectHeader::new("ZFG_UTIL", "ZDEMO", "Utilities"));
        let root = parse(&FunctionGroupSpec.create_body(&config).unwrap()).unwrap();
        assert_eq!(root.name, "group:abapFunctionGroup");
        assert_eq!(root.attr("adtcore:type"), Some("FUGR/F"));

        let object = FunctionGroupSpec.object_ref("ZFG_UTIL").unwrap();
        assert!(FunctionGroupSpec
            .create_payloads(&object, &config)
            .unwrap()
            .is_empty());
        let update = FunctionGroupSpec.update_payloads(&object, &config).unwrap();
        assert!(matches!(
            &update[..],
            [UpdatePayload::Metadata { uri, .. }] if uri == "/sap/bc/adt/functions/groups/zfg_util"
        ));
    }
}
