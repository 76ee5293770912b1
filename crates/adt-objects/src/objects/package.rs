//! Packages (`DEVC/K`).
//!
//! For packages `header.package` names the super package and may be empty
//! for a top-level package.

use abap_adt_client::security::xml;

use super::{upper, Adt, ObjectConfig, ObjectHeader, ObjectSpec};
use crate::client::xml_helpers::XML_DECL;
use crate::error::Result;
use crate::object_kind::{ObjectKind, ObjectRef};
use crate::workflow::UpdatePayload;

pub type AdtPackage = Adt<PackageSpec>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PackageType {
    #[default]
    Development,
    Structure,
    Main,
}

impl PackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Development => "development",
            PackageType::Structure => "structure",
            PackageType::Main => "main",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageConfig {
    pub header: ObjectHeader,
    pub package_type: PackageType,
    pub software_component: String,
    pub transport_layer: Option<String>,
    pub application_component: Option<String>,
}

impl PackageConfig {
    /// A development package in the `HOME` software component.
    pub fn new(header: ObjectHeader) -> Self {
        Self {
            header,
            package_type: PackageType::Development,
            software_component: "HOME".to_string(),
            transport_layer: None,
            application_component: None,
        }
    }

    pub fn with_type(mut self, package_type: PackageType) -> Self {
        self.package_type = package_type;
        self
    }

    pub fn with_software_component(mut self, component: impl Into<String>) -> Self {
        self.software_component = upper(component);
        self
    }

    pub fn with_transport_layer(mut self, layer: impl Into<String>) -> Self {
        self.transport_layer = Some(upper(layer));
        self
    }

    pub fn with_application_component(mut self, component: impl Into<String>) -> Self {
        self.application_component = Some(upper(component));
        self
    }
}

impl ObjectConfig for PackageConfig {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }

    fn validate(&self) -> Result<()> {
        self.header.check_fields(false)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PackageSpec;

impl ObjectSpec for PackageSpec {
    type Config = PackageConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::Package
    }

    fn create_body(&self, config: &PackageConfig) -> Result<String> {
        let header = &config.header;
        let super_package = if header.package.is_empty() {
            "<pak:superPackage/>".to_string()
        } else {
            format!(
                "<pak:superPackage adtcore:name=\"{}\"/>",
                xml::escape(&header.package)
            )
        };
        let application_component = match &config.application_component {
            Some(component) => format!(
                "<pak:applicationComponent pak:name=\"{}\"/>",
                xml::escape(component)
            ),
            None => "<pak:applicationComponent/>".to_string(),
        };
        Ok(format!(
            r#"{XML_DECL}
<pak:package xmlns:pak="http://www.sap.com/adt/packages" {}>
  <adtcore:packageRef adtcore:name="{}"/>
  <pak:attributes pak:packageType="{}"/>
  {super_package}
  {application_component}
  <pak:transport>
    <pak:softwareComponent pak:name="{}"/>
    <pak:transportLayer pak:name="{}"/>
  </pak:transport>
  <pak:translation/>
  <pak:useAccesses/>
  <pak:packageInterfaces/>
  <pak:subPackages/>
</pak:package>"#,
            header.root_attributes(ObjectKind::Package),
            xml::escape(&header.name),
            config.package_type.as_str(),
            xml::escape(&config.software_component),
            xml::escape(config.transport_layer.as_deref().unwrap_or_default()),
        ))
    }

    fn create_payloads(&self, _object: &ObjectRef, _config: &PackageConfig) -> Result<Vec<UpdatePayload>> {
        Ok(Vec::new())
    }
}
