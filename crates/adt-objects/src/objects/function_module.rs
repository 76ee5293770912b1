//! Function modules (`FUGR/FF`), addressed through their group.

use abap_adt_client::security::xml;
use abap_adt_client::AdtConnection;

use super::{upper, Adt, ObjectConfig, ObjectHeader, ObjectSpec};
use crate::client::xml_helpers::XML_DECL;
use crate::error::Result;
use crate::object_kind::{ObjectKind, ObjectRef};

pub type AdtFunctionModule = Adt<FunctionModuleSpec>;

impl AdtFunctionModule {
    /// Handle for the modules of one function group.
    pub fn for_group(conn: AdtConnection, group: impl Into<String>) -> Self {
        Self::with_spec(conn, FunctionModuleSpec::new(group))
    }
}

/// The package is taken from the group; `header.package` may stay empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionModuleConfig {
    pub header: ObjectHeader,
    pub source: Option<String>,
}

impl FunctionModuleConfig {
    pub fn new(header: ObjectHeader) -> Self {
        Self {
            header,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl ObjectConfig for FunctionModuleConfig {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn validate(&self) -> Result<()> {
        self.header.check_fields(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionModuleSpec {
    group: String,
}

impl FunctionModuleSpec {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: upper(group),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }
}

impl ObjectSpec for FunctionModuleSpec {
    type Config = FunctionModuleConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::FunctionModule
    }

    fn object_ref(&self, name: &str) -> Result<ObjectRef> {
        ObjectRef::function_module(&self.group, name)
    }

    fn create_body(&self, config: &FunctionModuleConfig) -> Result<String> {
        let group = ObjectRef::new(ObjectKind::FunctionGroup, &self.group)?;
        Ok(format!(
            "{XML_DECL}\n<fmodule:abapFunctionModule xmlns:fmodule=\"http://www.sap.com/adt/functions/fmodules\" {}>\n  <adtcore:containerRef adtcore:name=\"{}\" adtcore:type=\"FUGR/F\" adtcore:uri=\"{}\"/>\n</fmodule:abapFunctionModule>",
            config.header.root_attributes(ObjectKind::FunctionModule),
            xml::escape(&group.name),
            xml::escape(&group.uri),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::connection;
    use crate::client::xml_helpers::parse;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_create_body_references_group() {
        let spec = FunctionModuleSpec::new("zfg_util");
        let config = FunctionModuleConfig::new(ObjectHeader::new("Z_GET_DATE", "", "Get date"));
        assert!(config.validate().is_ok());

        let root = parse(&spec.create_body(&config).unwrap()).unwrap();
        assert_eq!(root.name, "fmodule:abapFunctionModule");
        assert_eq!(root.attr("adtcore:type"), Some("FUGR/FF"));
        let container = root.child("adtcore:containerRef").unwrap();
        assert_eq!(container.attr("adtcore:name"), Some("ZFG_UTIL"));
        assert_eq!(
            container.attr("adtcore:uri"),
            Some("/sap/bc/adt/functions/groups/zfg_util")
        );
        assert!(root.child("packageRef").is_none());
    }

    #[tokio::test]
    async fn test_read_source_under_group() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/sap/bc/adt/functions/groups/zfg_util/fmodules/z_get_date/source/main",
            ))
            .and(query_param("version", "active"))
            .respond_with(ResponseTemplate::new(200).set_body_string("FUNCTION z_get_date."))
            .expect(1)
            .mount(&server)
            .await;

        let modules = AdtFunctionModule::for_group(connection(&server).await, "ZFG_UTIL");
        assert_eq!(modules.spec().group(), "ZFG_UTIL");
        let source = modules
            .read_source("Z_GET_DATE", crate::types::Version::Active)
            .await
            .unwrap();
        assert_eq!(source, "FUNCTION z_get_date.");
    }
}
